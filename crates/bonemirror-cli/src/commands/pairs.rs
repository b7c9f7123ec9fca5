//! Pairs command implementation
//!
//! Prints the bone and curve pair tables resolved for a skeleton.

use anyhow::{Context, Result};
use bonemirror_core::{MirrorPlane, MirrorTables, Skeleton};
use colored::Colorize;
use serde_json::json;
use std::process::ExitCode;

use super::load_inputs;

/// Run the pairs command
///
/// # Arguments
/// * `skeleton_path` - Path to the skeleton JSON document
/// * `config_path` - Optional configuration file (JSON or YAML)
/// * `plane` - Optional mirror plane override
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success
pub fn run(
    skeleton_path: &str,
    config_path: Option<&str>,
    plane: Option<MirrorPlane>,
    json_output: bool,
) -> Result<ExitCode> {
    let (skeleton, config) = load_inputs(skeleton_path, config_path, plane)?;
    let tables = MirrorTables::build(&skeleton, &config);

    if json_output {
        let output = pairs_json(&skeleton, &tables);
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize pairs")?;
        println!("{}", text);
    } else {
        print_human(&skeleton, &tables);
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the JSON form of the pair tables.
pub fn pairs_json(skeleton: &Skeleton, tables: &MirrorTables) -> serde_json::Value {
    json!({
        "plane": tables.plane(),
        "bone_pairs": tables.bone_pairs(),
        "curve_pairs": tables.curve_pairs(),
        "unmirrored": unmirrored(skeleton, tables),
    })
}

fn unmirrored<'a>(skeleton: &'a Skeleton, tables: &MirrorTables) -> Vec<&'a str> {
    skeleton
        .bones()
        .iter()
        .enumerate()
        .filter(|(index, _)| tables.rule(*index).is_none())
        .map(|(_, bone)| bone.name.as_str())
        .collect()
}

fn print_human(skeleton: &Skeleton, tables: &MirrorTables) {
    println!(
        "{} {} plane",
        "Bone pairs:".cyan().bold(),
        tables.plane()
    );
    for (a, b) in tables.bone_pairs().pairs() {
        if a == b {
            println!("  {} {}", a, "(self)".dimmed());
        } else {
            println!("  {} <-> {}", a, b);
        }
    }

    let rest = unmirrored(skeleton, tables);
    if !rest.is_empty() {
        println!("{} {}", "Unmirrored:".yellow().bold(), rest.join(", "));
    }

    println!("{}", "Curve pairs:".cyan().bold());
    if tables.curve_pairs().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (a, b) in tables.curve_pairs().pairs() {
        println!("  {} <-> {}", a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonemirror_core::{MirrorConfig, Transform};
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pairs_json_shape() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Arm_L", "Root", Transform::from_translation(Vec3::X))
            .child("Arm_R", "Root", Transform::from_translation(-Vec3::X))
            .child("Pouch", "Root", Transform::from_translation(Vec3::new(0.2, 0.1, 0.0)))
            .curve("Smile_L")
            .curve("Smile_R")
            .build()
            .unwrap();
        let tables = MirrorTables::build(&skeleton, &MirrorConfig::default());

        let value = pairs_json(&skeleton, &tables);
        assert_eq!(
            value,
            json!({
                "plane": "yz",
                "bone_pairs": [["Root", "Root"], ["Arm_L", "Arm_R"]],
                "curve_pairs": [["Smile_L", "Smile_R"]],
                "unmirrored": ["Pouch"],
            })
        );
    }
}
