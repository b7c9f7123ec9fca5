//! Loading of skeleton, configuration and pose documents.
//!
//! Skeletons and poses are JSON. Configuration may be JSON or YAML and is
//! dispatched by file extension.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bonemirror_core::{CurveSet, MirrorConfig, Pose, PoseContext, Skeleton, Transform};
use log::warn;
use serde::{Deserialize, Serialize};

/// Recognized JSON extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Recognized YAML extensions.
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Errors from loading input documents.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown file extension.
    UnknownExtension { extension: Option<String> },

    /// The document could not be parsed.
    Parse { path: PathBuf, message: String },

    /// The document parsed but failed validation.
    Invalid { path: PathBuf, message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(
                    f,
                    "unknown file extension '.{}' (expected .json, .yaml or .yml)",
                    ext
                ),
                None => write!(f, "file has no extension (expected .json, .yaml or .yml)"),
            },
            InputError::Parse { path, message } => {
                write!(f, "failed to parse '{}': {}", path.display(), message)
            }
            InputError::Invalid { path, message } => {
                write!(f, "invalid document '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> InputError {
    InputError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

// =============================================================================
// Skeleton & Config
// =============================================================================

/// Loads a skeleton document.
pub fn load_skeleton(path: &Path) -> Result<Skeleton, InputError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| parse_error(path, e))
}

/// Loads a configuration file, or the default configuration when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<MirrorConfig, InputError> {
    let Some(path) = path else {
        return Ok(MirrorConfig::default());
    };

    let ext = extension(path);
    let content = read(path)?;
    let config: MirrorConfig = match ext.as_deref() {
        Some(e) if JSON_EXTENSIONS.contains(&e) => {
            serde_json::from_str(&content).map_err(|e| parse_error(path, e))?
        }
        Some(e) if YAML_EXTENSIONS.contains(&e) => {
            serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?
        }
        _ => return Err(InputError::UnknownExtension { extension: ext.clone() }),
    };

    config.validate().map_err(|e| InputError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(config)
}

// =============================================================================
// Pose Document
// =============================================================================

/// A pose keyed by bone name, with curve values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseDocument {
    /// Local bone transforms by name.
    #[serde(default)]
    pub bones: BTreeMap<String, Transform>,
    /// Curve values by name.
    #[serde(default)]
    pub curves: CurveSet,
}

impl PoseDocument {
    /// Builds a pose context. Bones absent from the document take their bind
    /// transform; names the skeleton does not know are ignored.
    pub fn to_context(&self, skeleton: &Skeleton, case_sensitive: bool) -> PoseContext {
        let mut pose = Pose::bind(skeleton);
        for (name, transform) in &self.bones {
            match skeleton.find_bone_with_case(name, case_sensitive) {
                Some(index) => {
                    pose.set(index, *transform);
                }
                None => warn!("pose bone '{}' is not in the skeleton; ignored", name),
            }
        }
        PoseContext::new(pose, self.curves.clone())
    }

    /// Captures every bone of a pose context by its skeleton name.
    pub fn from_context(skeleton: &Skeleton, context: &PoseContext) -> Self {
        let bones = skeleton
            .bones()
            .iter()
            .zip(context.pose.as_slice())
            .map(|(bone, transform)| (bone.name.clone(), *transform))
            .collect();
        Self {
            bones,
            curves: context.curves.clone(),
        }
    }
}

/// Loads a pose document.
pub fn load_pose(path: &Path) -> Result<PoseDocument, InputError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| parse_error(path, e))
}
