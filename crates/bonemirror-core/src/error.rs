//! Error types for skeleton loading and mirror configuration.
//!
//! Only construction and loading can fail. Building the mirror tables and
//! evaluating a pose never return errors: anything that cannot be resolved is
//! simply left unmirrored.

use thiserror::Error;

/// Errors raised while constructing a [`Skeleton`](crate::skeleton::Skeleton).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkeletonError {
    /// A bone has an empty name.
    #[error("bone {0} has an empty name")]
    EmptyName(usize),

    /// Two bones share a name. Names compare case-insensitively.
    #[error("duplicate bone name: {0}")]
    DuplicateBone(String),

    /// A bone references a parent index that does not precede it.
    #[error("bone '{bone}' has invalid parent index {parent}")]
    InvalidParent {
        /// Name of the offending bone.
        bone: String,
        /// The parent index it declared.
        parent: usize,
    },

    /// A builder call referenced a parent bone that was never added.
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent {
        /// Name of the offending bone.
        bone: String,
        /// The parent name that could not be found.
        parent: String,
    },

    /// Two curve identifiers collide. Names compare case-insensitively.
    #[error("duplicate curve name: {0}")]
    DuplicateCurve(String),
}

/// Errors raised while parsing or validating a [`MirrorConfig`](crate::config::MirrorConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The mirror plane name is not one of `xz`, `yz`, `xy`.
    #[error("unknown mirror plane '{0}' (expected xz, yz or xy)")]
    UnknownPlane(String),

    /// The self-mirror tolerance is negative or not finite.
    #[error("plane tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f32),
}

/// Top-level error type for loading mirror inputs.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The skeleton failed validation.
    #[error("invalid skeleton: {0}")]
    Skeleton(#[from] SkeletonError),

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
