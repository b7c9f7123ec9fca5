//! Rigid transforms and Euler rotators.
//!
//! [`Transform`] follows the bone-hierarchy convention used throughout the
//! crate: `child * parent` applies `child` first and then `parent`, so a
//! component-space transform is `local * parent_component`.

use std::ops::Mul;

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Scale components at or below this magnitude have no usable reciprocal.
const SMALL_NUMBER: f32 = 1.0e-8;

// =============================================================================
// Transform
// =============================================================================

/// Translation, rotation and (possibly non-uniform) scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transform {
    /// Translation.
    #[serde(default)]
    pub translation: Vec3,
    /// Rotation as a unit quaternion, serialized `[x, y, z, w]`.
    #[serde(default)]
    pub rotation: Quat,
    /// Per-axis scale.
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

pub(crate) fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform from all three components.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Creates a pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Creates a pure rotation.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Creates a unit-scale transform from a rotation and translation.
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Returns `r` such that `r * other == self`.
    ///
    /// This expresses `self` in the frame of `other`; for a bone, the current
    /// local transform relative to its bind transform is the animated delta.
    pub fn relative_to(&self, other: &Transform) -> Transform {
        let inv_scale = safe_reciprocal(other.scale);
        let inv_rotation = other.rotation.inverse();
        Transform {
            translation: (inv_rotation * (self.translation - other.translation)) * inv_scale,
            rotation: (inv_rotation * self.rotation).normalize(),
            scale: self.scale * inv_scale,
        }
    }

    /// Returns the rotation/scale block. Column `j` is local axis `j`
    /// expressed in the parent frame.
    pub fn to_matrix3(&self) -> Mat3 {
        Mat3::from_quat(self.rotation) * Mat3::from_diagonal(self.scale)
    }

    /// Returns true if both transforms agree component-wise within `tolerance`.
    /// `q` and `-q` are treated as the same rotation.
    pub fn approx_eq(&self, other: &Transform, tolerance: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, tolerance)
            && self.scale.abs_diff_eq(other.scale, tolerance)
            && (self.rotation.abs_diff_eq(other.rotation, tolerance)
                || self.rotation.abs_diff_eq(-other.rotation, tolerance))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `self` is applied first, then `parent`.
    fn mul(self, parent: Transform) -> Transform {
        Transform {
            translation: parent.rotation * (parent.scale * self.translation) + parent.translation,
            rotation: (parent.rotation * self.rotation).normalize(),
            scale: self.scale * parent.scale,
        }
    }
}

fn safe_reciprocal(v: Vec3) -> Vec3 {
    let recip = |c: f32| if c.abs() <= SMALL_NUMBER { 0.0 } else { 1.0 / c };
    Vec3::new(recip(v.x), recip(v.y), recip(v.z))
}

// =============================================================================
// Rotator
// =============================================================================

/// Euler rotation in degrees: roll about X, pitch about Y, yaw about Z.
///
/// The rotation composes as `yaw * pitch * roll`, so each channel is a
/// rotation about a single axis and reflecting a channel reflects that factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation about X in degrees.
    #[serde(default)]
    pub roll: f32,
    /// Rotation about Y in degrees.
    #[serde(default)]
    pub pitch: f32,
    /// Rotation about Z in degrees.
    #[serde(default)]
    pub yaw: f32,
}

impl Rotator {
    /// Creates a rotator from roll, pitch and yaw in degrees.
    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Decomposes a quaternion.
    pub fn from_quat(rotation: Quat) -> Self {
        let (yaw, pitch, roll) = rotation.to_euler(EulerRot::ZYX);
        Self {
            roll: roll.to_degrees(),
            pitch: pitch.to_degrees(),
            yaw: yaw.to_degrees(),
        }
    }

    /// Composes the quaternion.
    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn test_mul_applies_child_then_parent() {
        let child = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let parent = Transform::new(
            Vec3::new(0.0, 0.0, 5.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::splat(2.0),
        );

        let component = child * parent;
        // Scaled by 2, rotated +90 about Z (X -> Y), then offset.
        assert!(component
            .translation
            .abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), EPS));
        assert!(component.scale.abs_diff_eq(Vec3::splat(2.0), EPS));
    }

    #[test]
    fn test_relative_to_inverts_mul() {
        let bind = Transform::new(
            Vec3::new(3.0, -1.0, 2.0),
            Quat::from_euler(EulerRot::ZYX, 0.3, -0.7, 1.1),
            Vec3::new(1.0, 2.0, 0.5),
        );
        let current = Transform::new(
            Vec3::new(2.5, 0.0, 1.0),
            Quat::from_euler(EulerRot::ZYX, -0.2, 0.4, 0.9),
            Vec3::new(1.0, 2.0, 0.5),
        );

        let delta = current.relative_to(&bind);
        let rebuilt = delta * bind;
        assert!(rebuilt.approx_eq(&current, 1.0e-4));
        assert!(delta.scale.abs_diff_eq(Vec3::ONE, EPS));
    }

    #[test]
    fn test_relative_to_self_is_identity() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.5),
            Vec3::ONE,
        );
        assert!(t.relative_to(&t).approx_eq(&Transform::IDENTITY, EPS));
    }

    #[test]
    fn test_relative_to_zero_scale_is_finite() {
        let bind = Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.0, 1.0, 1.0));
        let delta = Transform::from_translation(Vec3::ONE).relative_to(&bind);
        assert!(delta.translation.is_finite());
        assert_eq!(delta.translation.x, 0.0);
    }

    #[test]
    fn test_matrix_columns_are_local_axes() {
        let t = Transform::from_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let m = t.to_matrix3();
        assert!(m.col(0).abs_diff_eq(Vec3::Y, EPS));
        assert!(m.col(1).abs_diff_eq(-Vec3::X, EPS));
        assert!(m.col(2).abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_transform_serde_defaults() {
        let t: Transform = serde_json::from_str(r#"{"translation":[1.0,2.0,3.0]}"#).unwrap();
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);

        let json = serde_json::to_string(&Transform::IDENTITY).unwrap();
        assert!(json.contains("\"rotation\":[0.0,0.0,0.0,1.0]"));
    }

    #[test]
    fn test_transform_rejects_unknown_field() {
        let result = serde_json::from_str::<Transform>(r#"{"rotaton":[0.0,0.0,1.0,0.0]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rotator_single_axis() {
        let roll = Rotator::new(30.0, 0.0, 0.0).to_quat();
        assert!(roll.abs_diff_eq(Quat::from_rotation_x(30f32.to_radians()), EPS));

        let pitch = Rotator::new(0.0, 30.0, 0.0).to_quat();
        assert!(pitch.abs_diff_eq(Quat::from_rotation_y(30f32.to_radians()), EPS));

        let yaw = Rotator::new(0.0, 0.0, 30.0).to_quat();
        assert!(yaw.abs_diff_eq(Quat::from_rotation_z(30f32.to_radians()), EPS));
    }

    #[test]
    fn test_rotator_roundtrip() {
        let rot = Rotator::new(12.0, -35.0, 80.0);
        let back = Rotator::from_quat(rot.to_quat());
        assert!((back.roll - 12.0).abs() < 1.0e-3);
        assert!((back.pitch + 35.0).abs() < 1.0e-3);
        assert!((back.yaw - 80.0).abs() < 1.0e-3);
    }
}
