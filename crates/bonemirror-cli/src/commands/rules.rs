//! Rules command implementation
//!
//! Prints the flip rule of every mirrored bone: axis classification, channel
//! map and signs.

use anyhow::{Context, Result};
use bonemirror_core::{FlipRule, MirrorPlane, MirrorTables, Skeleton};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::load_inputs;

const CHANNEL_NAMES: [&str; 6] = ["tx", "ty", "tz", "roll", "pitch", "yaw"];

/// One row of the rule table.
#[derive(Debug, Clone, Serialize)]
pub struct RuleRow {
    /// Source bone.
    pub bone: String,
    /// Bind-pose axis correspondence of the source bone.
    pub axes: [i8; 3],
    /// The rule itself.
    #[serde(flatten)]
    pub rule: FlipRule,
}

/// Run the rules command
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
    let rows = rule_rows(&skeleton, &tables);

    if json_output {
        let text = serde_json::to_string_pretty(&rows).context("Failed to serialize rules")?;
        println!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} plane, {} rules",
        "Flip rules:".cyan().bold(),
        tables.plane(),
        rows.len()
    );
    for row in &rows {
        println!(
            "  {} -> {} {}",
            row.bone.bold(),
            row.rule.mirror_bone,
            format!("axes {:?}", row.axes).as_str().dimmed()
        );
        println!("    {}", describe_channels(&row.rule));
    }
    Ok(ExitCode::SUCCESS)
}

/// Collects the rule table in skeleton order.
pub fn rule_rows(skeleton: &Skeleton, tables: &MirrorTables) -> Vec<RuleRow> {
    tables
        .rules()
        .filter_map(|(index, rule)| {
            let bone = skeleton.bone(index)?;
            Some(RuleRow {
                bone: bone.name.clone(),
                axes: tables.axes(index).unwrap_or_default().as_array(),
                rule: rule.clone(),
            })
        })
        .collect()
}

/// Formats a rule as `tx->-tx ty->ty ...`.
pub fn describe_channels(rule: &FlipRule) -> String {
    rule.channel_map
        .iter()
        .zip(rule.signs.iter())
        .enumerate()
        .map(|(source, (dest, sign))| {
            let sign = if *sign < 0 { "-" } else { "" };
            format!("{}->{}{}", CHANNEL_NAMES[source], sign, CHANNEL_NAMES[*dest])
        })
        .collect::<Vec<_>>()
        .join(" ")
}
