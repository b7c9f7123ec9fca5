//! Bone Mirror Integration Test Infrastructure
//!
//! This crate holds tests that span the core library and the CLI:
//!
//! - Scenarios: end-to-end pairing and mirroring of small rigs
//! - **Properties**: proptest checks of classification, pairing and rules
//! - CLI: file round trips through the command implementations
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bonemirror-tests
//! cargo test -p bonemirror-tests --test properties
//! ```

use std::fs;
use std::path::PathBuf;

use bonemirror_core::{MirrorConfig, Skeleton, Transform};
use glam::{Quat, Vec3};
use tempfile::TempDir;

/// Translation-only transform.
pub fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

/// `Root`, `Spine`, `Arm_L`, `Arm_R` with `Smile_L`/`Smile_R` curves.
pub fn arm_rig() -> Skeleton {
    Skeleton::builder()
        .root("Root", Transform::IDENTITY)
        .child("Spine", "Root", at(0.0, 0.0, 1.0))
        .child("Arm_L", "Spine", at(0.5, 0.0, 0.2))
        .child("Arm_R", "Spine", at(-0.5, 0.0, 0.2))
        .curve("Smile_L")
        .curve("Smile_R")
        .build()
        .expect("arm rig is valid")
}

/// Arm rig plus twist bones on each arm and a jaw curve.
pub fn twist_rig() -> Skeleton {
    Skeleton::builder()
        .root("Root", Transform::IDENTITY)
        .child("Spine", "Root", at(0.0, 0.0, 1.0))
        .child("Arm_L", "Spine", at(0.5, 0.0, 0.2))
        .child("Arm_R", "Spine", at(-0.5, 0.0, 0.2))
        .child("Arm_L_Twist", "Arm_L", at(0.25, 0.0, 0.0))
        .child("Arm_R_Twist", "Arm_R", at(-0.25, 0.0, 0.0))
        .curve("Smile_L")
        .curve("Smile_R")
        .curve("Jaw_Open")
        .build()
        .expect("twist rig is valid")
}

/// A rig authored the way most DCC exports look: the right side is the left
/// side rotated half a turn, with a hand whose local X runs along world Y.
pub fn authored_rig() -> Skeleton {
    let half_turn = Quat::from_rotation_z(std::f32::consts::PI);
    let quarter_turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
    Skeleton::builder()
        .root("pelvis", Transform::IDENTITY)
        .child("spine_01", "pelvis", at(0.0, 0.0, 0.3))
        .child("clavicle_l", "spine_01", at(0.15, 0.0, 0.4))
        .child(
            "clavicle_r",
            "spine_01",
            Transform::from_rotation_translation(half_turn, Vec3::new(-0.15, 0.0, 0.4)),
        )
        .child(
            "hand_l",
            "clavicle_l",
            Transform::from_rotation_translation(quarter_turn, Vec3::new(0.6, 0.0, 0.0)),
        )
        .child(
            "hand_r",
            "clavicle_r",
            Transform::from_rotation_translation(quarter_turn, Vec3::new(0.6, 0.0, 0.0)),
        )
        .child("thigh_left", "pelvis", at(0.1, 0.0, -0.1))
        .child("thigh_right", "pelvis", at(-0.1, 0.0, -0.1))
        .curve("blink_l")
        .curve("blink_r")
        .build()
        .expect("authored rig is valid")
}

/// Configuration pairing on `_L`/`_R` only.
pub fn lr_config() -> MirrorConfig {
    MirrorConfig::default().with_search_replace_pairs("_L,_R")
}

/// Files written into a temporary directory.
pub struct FileFixture {
    pub root: TempDir,
}

impl FileFixture {
    /// Creates an empty fixture directory.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Writes a file and returns its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Writes a skeleton as JSON.
    pub fn write_skeleton(&self, name: &str, skeleton: &Skeleton) -> PathBuf {
        let json = serde_json::to_string_pretty(skeleton).expect("skeleton serializes");
        self.write(name, &json)
    }

    /// Path of a file in the fixture directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }
}

impl Default for FileFixture {
    fn default() -> Self {
        Self::new()
    }
}
