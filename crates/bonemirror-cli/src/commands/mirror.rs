//! Mirror command implementation
//!
//! Mirrors a pose document through a freshly initialized node and writes the
//! result as JSON.

use anyhow::{Context, Result};
use bonemirror_core::{MirrorConfig, MirrorNode, MirrorPlane, Skeleton};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::load_inputs;
use crate::input::{load_pose, PoseDocument};

/// Run the mirror command
///
/// # Arguments
/// * `skeleton_path` - Path to the skeleton JSON document
/// * `pose_path` - Path to the pose JSON document
/// * `config_path` - Optional configuration file (JSON or YAML)
/// * `plane` - Optional mirror plane override
/// * `output` - Output file path (default: stdout)
/// * `pretty` - Whether to pretty-print the output JSON
///
/// # Returns
/// Exit code: 0 on success
pub fn run(
    skeleton_path: &str,
    pose_path: &str,
    config_path: Option<&str>,
    plane: Option<MirrorPlane>,
    output: Option<&str>,
    pretty: bool,
) -> Result<ExitCode> {
    let (skeleton, config) = load_inputs(skeleton_path, config_path, plane)?;
    let pose = load_pose(Path::new(pose_path))
        .with_context(|| format!("Failed to load pose: {}", pose_path))?;

    let mirrored = mirror_document(&skeleton, config, &pose);
    let json = if pretty {
        serde_json::to_string_pretty(&mirrored)
    } else {
        serde_json::to_string(&mirrored)
    }
    .context("Failed to serialize mirrored pose")?;

    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write output: {}", path))?;
            println!("{} wrote {}", "SUCCESS".green().bold(), path);
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}

/// Mirrors a pose document.
pub fn mirror_document(
    skeleton: &Skeleton,
    config: MirrorConfig,
    pose: &PoseDocument,
) -> PoseDocument {
    let case_sensitive = config.case_sensitive;
    let mut node = MirrorNode::new(config);
    node.initialize(skeleton);

    let mut context = pose.to_context(skeleton, case_sensitive);
    node.evaluate(skeleton, &mut context);
    PoseDocument::from_context(skeleton, &context)
}
