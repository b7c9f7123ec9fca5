//! Bone Mirror Core Library
//!
//! This crate reflects skeletal poses across an axis-aligned plane. Mirror
//! relationships are inferred from the skeleton's bind pose once, and the
//! resulting tables are applied to live poses and curve values every frame.
//!
//! # Overview
//!
//! Building the tables runs four stages:
//!
//! - **Classification**: each bone's local axes are matched to world axes
//! - **Pairing**: bones and curves are paired by name token substitution,
//!   with on-plane bones mirroring themselves
//! - **Flip rules**: each pair gets a channel remap and per-channel signs
//! - **Runtime**: pose deltas and curve values are exchanged through the rules
//!
//! # Example
//!
//! ```
//! use bonemirror_core::{MirrorConfig, MirrorNode, PoseContext, Skeleton, Transform};
//! use glam::Vec3;
//!
//! let skeleton = Skeleton::builder()
//!     .root("Root", Transform::IDENTITY)
//!     .child("Arm_L", "Root", Transform::from_translation(Vec3::new(0.5, 0.0, 0.0)))
//!     .child("Arm_R", "Root", Transform::from_translation(Vec3::new(-0.5, 0.0, 0.0)))
//!     .build()
//!     .unwrap();
//!
//! let mut node = MirrorNode::new(MirrorConfig::default().with_search_replace_pairs("_L,_R"));
//! node.initialize(&skeleton);
//!
//! let mut context = PoseContext::bind(&skeleton);
//! context.pose.set(1, Transform::from_translation(Vec3::new(0.6, 0.0, 0.0)));
//! node.evaluate(&skeleton, &mut context);
//!
//! let arm_r = context.pose.get(2).unwrap();
//! assert!((arm_r.translation.x + 0.6).abs() < 1.0e-5);
//! ```
//!
//! # Modules
//!
//! - [`classify`]: Bind-pose axis classification
//! - [`config`]: Mirror plane and node configuration
//! - [`error`]: Error types for loading and validation
//! - [`fingerprint`]: Canonical hashing of skeleton and configuration
//! - [`flip`]: Flip rules and rule construction
//! - [`node`]: Node lifecycle
//! - [`pairing`]: Bone and curve name pairing
//! - [`pose`]: Pose and curve buffers
//! - [`runtime`]: Per-frame pose and curve mirroring
//! - [`skeleton`]: Reference skeleton
//! - [`tables`]: Immutable mirror tables
//! - [`transform`]: Transforms and Euler rotators

pub mod classify;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod flip;
pub mod node;
pub mod pairing;
pub mod pose;
pub mod runtime;
pub mod skeleton;
pub mod tables;
pub mod transform;

// Re-export commonly used types at the crate root
pub use classify::{is_signed_permutation, AxisCorrespondence};
pub use config::{MirrorConfig, MirrorPlane, DEFAULT_PLANE_TOLERANCE, DEFAULT_SEARCH_REPLACE_PAIRS};
pub use error::{ConfigError, MirrorError, SkeletonError};
pub use fingerprint::fingerprint;
pub use flip::{build_pair_rules, Channels, FlipRule, PairSide, CHANNEL_COUNT};
pub use node::{MirrorNode, NodeInputs};
pub use pairing::{resolve_bone_pairs, resolve_curve_pairs, NameMatcher, PairTable};
pub use pose::{CurveSet, Pose, PoseContext};
pub use runtime::{mirror_curves, mirror_pose};
pub use skeleton::{BoneInfo, NameIndex, Skeleton, SkeletonBuilder, SkeletonDocument};
pub use tables::MirrorTables;
pub use transform::{Rotator, Transform};
