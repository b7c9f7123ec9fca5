//! Per-frame pose and curve mirroring.
//!
//! Both mirrorers read every source value before writing any destination, so a
//! pair always exchanges pre-mirror values.

use log::debug;

use crate::pose::{CurveSet, Pose};
use crate::skeleton::Skeleton;
use crate::tables::MirrorTables;
use crate::transform::Transform;

/// Mirrors a pose in place.
///
/// For every bone with a rule, its delta from bind pose is reflected through
/// that rule and applied on top of the mirror bone's bind transform. Bones
/// without a rule, and slots the pose does not have, are left untouched.
/// Returns the number of bones written.
pub fn mirror_pose(tables: &MirrorTables, skeleton: &Skeleton, pose: &mut Pose) -> usize {
    let mut writes: Vec<(usize, Transform)> = Vec::with_capacity(tables.operate_bones().len());

    for (source, rule) in tables.rules() {
        let (Some(current), Some(source_bind)) = (pose.get(source), skeleton.local_bind(source))
        else {
            continue;
        };
        let Some(target_bind) = skeleton.local_bind(rule.mirror_index) else {
            continue;
        };
        let delta = current.relative_to(source_bind);
        let mirrored = rule.apply_to_delta(&delta);
        writes.push((rule.mirror_index, mirrored * *target_bind));
    }

    let mut written = 0;
    for (target, transform) in writes {
        if pose.set(target, transform) {
            written += 1;
        }
    }
    written
}

/// Swaps every paired curve value.
///
/// A pair is skipped for the frame when either side has no value. Returns the
/// number of pairs swapped.
pub fn mirror_curves(tables: &MirrorTables, curves: &mut CurveSet) -> usize {
    let mut swaps: Vec<(&str, f32, &str, f32)> = Vec::new();
    for (a, b) in tables.curve_pairs().pairs() {
        match (curves.get(a), curves.get(b)) {
            (Some(value_a), Some(value_b)) => swaps.push((a, value_a, b, value_b)),
            _ => debug!("curve pair {} <-> {} has no value this frame", a, b),
        }
    }

    let count = swaps.len();
    for (a, value_a, b, value_b) in swaps {
        curves.set(a, value_b);
        curves.set(b, value_a);
    }
    count
}
