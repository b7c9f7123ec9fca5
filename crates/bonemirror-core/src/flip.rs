//! Flip rules: per-bone channel remapping and sign flips.
//!
//! A bone delta is handled as six channels: translation X/Y/Z (0..=2) and
//! rotation roll/pitch/yaw (3..=5). A [`FlipRule`] sends each source channel to
//! a destination channel of the mirror bone and multiplies it by ±1.

use serde::{Deserialize, Serialize};

use crate::classify::AxisCorrespondence;
use crate::config::MirrorPlane;
use crate::transform::{Rotator, Transform};

/// Number of mirrored channels.
pub const CHANNEL_COUNT: usize = 6;

/// Translation X/Y/Z then roll/pitch/yaw in degrees.
pub type Channels = [f32; CHANNEL_COUNT];

/// Identity channel mapping.
pub const IDENTITY_CHANNEL_MAP: [usize; CHANNEL_COUNT] = [0, 1, 2, 3, 4, 5];

// =============================================================================
// Flip Rule
// =============================================================================

/// Channel remapping from a bone into its mirror bone's channel space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipRule {
    /// Name of the mirror bone.
    pub mirror_bone: String,
    /// Index of the mirror bone.
    pub mirror_index: usize,
    /// Destination channel for each source channel.
    pub channel_map: [usize; CHANNEL_COUNT],
    /// Sign applied to each source channel before it is written.
    pub signs: [i8; CHANNEL_COUNT],
}

impl FlipRule {
    /// A rule that copies every channel unchanged.
    pub fn identity(mirror_bone: impl Into<String>, mirror_index: usize) -> Self {
        Self {
            mirror_bone: mirror_bone.into(),
            mirror_index,
            channel_map: IDENTITY_CHANNEL_MAP,
            signs: [1; CHANNEL_COUNT],
        }
    }

    /// Remaps and sign-flips a channel vector.
    pub fn apply(&self, channels: &Channels) -> Channels {
        let mut out = [0.0; CHANNEL_COUNT];
        for (source, value) in channels.iter().enumerate() {
            out[self.channel_map[source]] = value * f32::from(self.signs[source]);
        }
        out
    }

    /// Permutes a scale vector like the translation channels, without signs.
    pub fn apply_scale(&self, scale: glam::Vec3) -> glam::Vec3 {
        let mut out = glam::Vec3::ONE;
        for source in 0..3 {
            out[self.channel_map[source]] = scale[source];
        }
        out
    }

    /// Reflects a delta transform into the mirror bone's frame.
    pub fn apply_to_delta(&self, delta: &Transform) -> Transform {
        let mirrored = self.apply(&delta_to_channels(delta));
        let mut out = channels_to_delta(&mirrored);
        out.scale = self.apply_scale(delta.scale);
        out
    }

    /// Returns true if translation maps only to translation and rotation only
    /// to rotation, each as a permutation.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = [false; CHANNEL_COUNT];
        for (source, &dest) in self.channel_map.iter().enumerate() {
            if dest >= CHANNEL_COUNT || seen[dest] || (source < 3) != (dest < 3) {
                return false;
            }
            seen[dest] = true;
        }
        self.signs.iter().all(|s| *s == 1 || *s == -1)
    }
}

/// Splits a delta transform into channels (scale is not a channel).
pub fn delta_to_channels(delta: &Transform) -> Channels {
    let rot = Rotator::from_quat(delta.rotation);
    [
        delta.translation.x,
        delta.translation.y,
        delta.translation.z,
        rot.roll,
        rot.pitch,
        rot.yaw,
    ]
}

/// Rebuilds a unit-scale delta transform from channels.
pub fn channels_to_delta(channels: &Channels) -> Transform {
    let rotation = Rotator::new(channels[3], channels[4], channels[5]).to_quat();
    let translation = glam::Vec3::new(channels[0], channels[1], channels[2]);
    Transform::from_rotation_translation(rotation, translation)
}

// =============================================================================
// Rule Construction
// =============================================================================

/// One side of a bone pair.
#[derive(Debug, Clone, Copy)]
pub struct PairSide<'a> {
    /// Bone name.
    pub name: &'a str,
    /// Bone index.
    pub index: usize,
    /// Bind-pose axis classification.
    pub axes: AxisCorrespondence,
}

/// Negates the second world→local vector when the first entries disagree in sign.
pub fn align_handedness(a: [i8; 3], b: [i8; 3]) -> ([i8; 3], [i8; 3]) {
    if a[0] * b[0] < 0 {
        (a, b.map(|v| -v))
    } else {
        (a, b)
    }
}

/// Rotation sign per world axis for one bone, from its aligned world→local vector.
///
/// Rotation about world axis `w` keeps its sign in the local frame when the
/// local axes for the two following world axes come in cyclic order and with
/// matching signs; each disagreement flips it.
pub fn rotation_flip_signs(aligned: &[i8; 3]) -> [i8; 3] {
    let mut signs = [1i8; 3];
    for (world, sign) in signs.iter_mut().enumerate() {
        let local = aligned[world].unsigned_abs();
        let next = aligned[(world + 1) % 3];
        let next_next = aligned[(world + 2) % 3];

        if (local % 3) + 1 != next.unsigned_abs() {
            *sign = -*sign;
        }
        if next < 0 {
            *sign = -*sign;
        }
        if next_next < 0 {
            *sign = -*sign;
        }
    }
    signs
}

/// Builds the rules for both sides of a pair.
///
/// The first rule maps `a` into `b`'s channel space, the second maps `b` into
/// `a`'s; both share the same signs with source and destination swapped. For a
/// self pair pass the same side twice.
pub fn build_pair_rules(
    a: PairSide<'_>,
    b: PairSide<'_>,
    plane: MirrorPlane,
) -> (FlipRule, FlipRule) {
    let world_to_local = [a.axes.world_to_local(), b.axes.world_to_local()];
    let (aligned_a, aligned_b) = align_handedness(world_to_local[0], world_to_local[1]);
    let rot_a = rotation_flip_signs(&aligned_a);
    let rot_b = rotation_flip_signs(&aligned_b);

    let t_base = plane.translation_signs();
    let r_base = plane.rotation_signs();

    let mut t_signs = [1i8; 3];
    let mut r_signs = [1i8; 3];
    for world in 0..3 {
        t_signs[world] =
            world_to_local[0][world].signum() * world_to_local[1][world].signum() * t_base[world];
        r_signs[world] = rot_a[world] * rot_b[world] * r_base[world];
    }

    (
        rule_into(&world_to_local[0], &world_to_local[1], b, &t_signs, &r_signs),
        rule_into(&world_to_local[1], &world_to_local[0], a, &t_signs, &r_signs),
    )
}

fn rule_into(
    from: &[i8; 3],
    to: &[i8; 3],
    target: PairSide<'_>,
    t_signs: &[i8; 3],
    r_signs: &[i8; 3],
) -> FlipRule {
    let mut rule = FlipRule::identity(target.name, target.index);
    for world in 0..3 {
        let source = usize::from(from[world].unsigned_abs()) - 1;
        let dest = usize::from(to[world].unsigned_abs()) - 1;
        rule.channel_map[source] = dest;
        rule.signs[source] = t_signs[world];
        rule.channel_map[source + 3] = dest + 3;
        rule.signs[source + 3] = r_signs[world];
    }
    rule
}
