//! CLI command implementations

pub mod mirror;
pub mod pairs;
pub mod rules;

use std::path::Path;

use anyhow::{Context, Result};
use bonemirror_core::{MirrorConfig, MirrorPlane, Skeleton};

use crate::input::{load_config, load_skeleton};

/// Loads the skeleton and configuration shared by every command.
///
/// `plane` overrides the configured mirror plane.
pub(crate) fn load_inputs(
    skeleton_path: &str,
    config_path: Option<&str>,
    plane: Option<MirrorPlane>,
) -> Result<(Skeleton, MirrorConfig)> {
    let skeleton = load_skeleton(Path::new(skeleton_path))
        .with_context(|| format!("Failed to load skeleton: {}", skeleton_path))?;
    let mut config = load_config(config_path.map(Path::new))
        .with_context(|| format!("Failed to load config: {}", config_path.unwrap_or("")))?;
    if let Some(plane) = plane {
        config.plane = plane;
    }
    Ok((skeleton, config))
}
