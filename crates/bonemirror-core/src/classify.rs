//! Axis classification of bind-pose bone frames.
//!
//! Each local axis of a bone is matched to the world axis it is most closely
//! aligned with. Classification runs in two phases:
//!
//! 1. Greedy: every local axis claims the world axis holding the largest
//!    absolute entry of its matrix column.
//! 2. Conflict resolution: for each contested world axis (X, Y, Z in order) the
//!    claimant with the larger entry on that axis keeps it. Losers, and columns
//!    that claimed nothing, take the next free world axis in cyclic X→Y→Z order
//!    after the contested one, signed by their entry on the new axis.
//!
//! The result is always a signed permutation. For genuinely ambiguous frames
//! (e.g. axes at 45° to the world) it is a valid but heuristic answer.

use glam::Mat3;
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Local→world signed axis mapping.
///
/// Element `i` holds `±(w + 1)` where `w` is the world axis (0 = X, 1 = Y,
/// 2 = Z) that local axis `i` aligns with, signed by the direction of alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i8; 3]", into = "[i8; 3]")]
pub struct AxisCorrespondence([i8; 3]);

impl AxisCorrespondence {
    /// Local axes coincide with world axes.
    pub const IDENTITY: Self = Self([1, 2, 3]);

    /// Validates a raw correspondence vector.
    pub fn new(values: [i8; 3]) -> Option<Self> {
        is_signed_permutation(&values).then_some(Self(values))
    }

    /// Classifies the columns of a rotation/scale block.
    pub fn from_matrix(matrix: &Mat3) -> Self {
        let columns = [matrix.col(0), matrix.col(1), matrix.col(2)];
        let entry = |local: usize, world: usize| columns[local][world];

        // Phase 1: greedy best match per local axis.
        let mut claims: [Option<usize>; 3] = [None; 3];
        for (local, claim) in claims.iter_mut().enumerate() {
            let mut best = 0.0f32;
            for world in 0..3 {
                let magnitude = entry(local, world).abs();
                if magnitude > best {
                    best = magnitude;
                    *claim = Some(world);
                }
            }
        }

        // Phase 2: each world axis goes to its strongest claimant.
        let mut owner: [Option<usize>; 3] = [None; 3];
        for world in 0..3 {
            let mut best: Option<(usize, f32)> = None;
            for local in 0..3 {
                if claims[local] != Some(world) {
                    continue;
                }
                let magnitude = entry(local, world).abs();
                if best.map_or(true, |(_, m)| magnitude > m) {
                    best = Some((local, magnitude));
                }
            }
            owner[world] = best.map(|(local, _)| local);
        }

        let mut assigned: [Option<usize>; 3] = [None; 3];
        for (world, local) in owner.iter().enumerate() {
            if let Some(local) = local {
                assigned[*local] = Some(world);
            }
        }

        for local in 0..3 {
            if assigned[local].is_some() {
                continue;
            }
            let start = claims[local].map_or(0, |contested| contested + 1);
            let free = (0..3)
                .map(|offset| (start + offset) % 3)
                .find(|world| owner[*world].is_none());
            if let Some(world) = free {
                owner[world] = Some(local);
                assigned[local] = Some(world);
            }
        }

        let mut values = [0i8; 3];
        for (local, value) in values.iter_mut().enumerate() {
            // Three locals and three worlds: every local ends up assigned.
            let world = assigned[local].unwrap_or(local);
            let sign: i8 = if entry(local, world) < 0.0 { -1 } else { 1 };
            *value = sign * (world as i8 + 1);
        }
        Self(values)
    }

    /// Classifies a bone's component-space bind transform (translation ignored).
    pub fn from_transform(transform: &Transform) -> Self {
        Self::from_matrix(&transform.to_matrix3())
    }

    /// Returns the raw vector.
    pub fn as_array(&self) -> [i8; 3] {
        self.0
    }

    /// World axis (0-based) that local axis `local` aligns with.
    pub fn world_axis(&self, local: usize) -> usize {
        usize::from(self.0[local].unsigned_abs()) - 1
    }

    /// Direction of alignment of local axis `local`.
    pub fn sign(&self, local: usize) -> i8 {
        self.0[local].signum()
    }

    /// Inverse mapping: element `w` holds `±(i + 1)` for the local axis `i`
    /// aligned with world axis `w`, with the same sign.
    pub fn world_to_local(&self) -> [i8; 3] {
        let mut inverse = [0i8; 3];
        for local in 0..3 {
            inverse[self.world_axis(local)] = self.sign(local) * (local as i8 + 1);
        }
        inverse
    }
}

impl Default for AxisCorrespondence {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[i8; 3]> for AxisCorrespondence {
    type Error = String;

    fn try_from(values: [i8; 3]) -> Result<Self, Self::Error> {
        Self::new(values).ok_or_else(|| format!("{values:?} is not a signed axis permutation"))
    }
}

impl From<AxisCorrespondence> for [i8; 3] {
    fn from(axes: AxisCorrespondence) -> Self {
        axes.0
    }
}

impl std::fmt::Display for AxisCorrespondence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [&str; 3] = ["X", "Y", "Z"];
        let parts: Vec<String> = (0..3)
            .map(|local| {
                let sign = if self.sign(local) < 0 { "-" } else { "+" };
                format!("{}{}", sign, NAMES[self.world_axis(local)])
            })
            .collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

/// Returns true if the absolute values are a permutation of `{1, 2, 3}`.
pub fn is_signed_permutation(values: &[i8; 3]) -> bool {
    let mut seen = [false; 3];
    for value in values {
        let axis = value.unsigned_abs();
        if !(1..=3).contains(&axis) || seen[usize::from(axis) - 1] {
            return false;
        }
        seen[usize::from(axis) - 1] = true;
    }
    true
}
