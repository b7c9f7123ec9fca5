//! Immutable mirror tables built once per initialization.

use log::{debug, info};
use serde::Serialize;

use crate::classify::AxisCorrespondence;
use crate::config::{MirrorConfig, MirrorPlane};
use crate::flip::{build_pair_rules, FlipRule, PairSide};
use crate::pairing::{resolve_bone_pairs, resolve_curve_pairs, NameMatcher, PairTable};
use crate::skeleton::Skeleton;

/// Everything evaluation needs, derived from a skeleton and configuration.
///
/// Tables are never mutated after [`MirrorTables::build`]; a node shares them
/// behind an `Arc` and replaces them wholesale on re-initialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorTables {
    plane: MirrorPlane,
    bone_pairs: PairTable,
    axes: Vec<AxisCorrespondence>,
    #[serde(skip)]
    rules: Vec<Option<FlipRule>>,
    operate_bones: Vec<usize>,
    curve_pairs: PairTable,
    bone_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

impl MirrorTables {
    /// Tables that mirror nothing.
    pub fn empty(bone_count: usize) -> Self {
        Self {
            plane: MirrorPlane::default(),
            bone_pairs: PairTable::new(),
            axes: vec![AxisCorrespondence::IDENTITY; bone_count],
            rules: vec![None; bone_count],
            operate_bones: Vec::new(),
            curve_pairs: PairTable::new(),
            bone_count,
            fingerprint: None,
        }
    }

    /// Classifies every bone, resolves bone and curve pairs and builds a flip
    /// rule for both sides of every pair.
    pub fn build(skeleton: &Skeleton, config: &MirrorConfig) -> Self {
        let matcher = NameMatcher::from_config(config);
        let plane = config.plane;

        let axes: Vec<AxisCorrespondence> = (0..skeleton.len())
            .map(|index| {
                skeleton
                    .component_bind(index)
                    .map(AxisCorrespondence::from_transform)
                    .unwrap_or_default()
            })
            .collect();

        let bone_pairs = resolve_bone_pairs(skeleton, &matcher, plane, config.plane_tolerance);
        let mut rules: Vec<Option<FlipRule>> = vec![None; skeleton.len()];
        let mut operate_bones = Vec::new();

        for (a_name, b_name) in bone_pairs.pairs() {
            let (Some(a), Some(b)) = (skeleton.find_bone(a_name), skeleton.find_bone(b_name))
            else {
                continue;
            };
            let side_a = PairSide {
                name: a_name,
                index: a,
                axes: axes[a],
            };
            let side_b = PairSide {
                name: b_name,
                index: b,
                axes: axes[b],
            };
            let (rule_a, rule_b) = build_pair_rules(side_a, side_b, plane);

            debug!(
                "{} -> {}: axes {} / {}, map {:?}, signs {:?}",
                a_name, b_name, axes[a], axes[b], rule_a.channel_map, rule_a.signs
            );

            rules[a] = Some(rule_a);
            operate_bones.push(a);
            if b != a {
                rules[b] = Some(rule_b);
                operate_bones.push(b);
            }
        }
        operate_bones.sort_unstable();

        let curve_pairs = resolve_curve_pairs(skeleton.curve_index(), &matcher);

        info!(
            "built mirror tables on {} plane: {} of {} bones mirrored, {} curve pairs",
            plane,
            operate_bones.len(),
            skeleton.len(),
            curve_pairs.pairs().count()
        );

        Self {
            plane,
            bone_pairs,
            axes,
            rules,
            operate_bones,
            curve_pairs,
            bone_count: skeleton.len(),
            fingerprint: None,
        }
    }

    /// Attaches the fingerprint of the inputs the tables were built from.
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Mirror plane the rules were built for.
    pub fn plane(&self) -> MirrorPlane {
        self.plane
    }

    /// Bone pair table.
    pub fn bone_pairs(&self) -> &PairTable {
        &self.bone_pairs
    }

    /// Bind-pose axis classification of a bone.
    pub fn axes(&self, bone: usize) -> Option<AxisCorrespondence> {
        self.axes.get(bone).copied()
    }

    /// Flip rule owned by a bone, if it is mirrored.
    pub fn rule(&self, bone: usize) -> Option<&FlipRule> {
        self.rules.get(bone).and_then(Option::as_ref)
    }

    /// Bones that own a flip rule, in skeleton order.
    pub fn operate_bones(&self) -> &[usize] {
        &self.operate_bones
    }

    /// Curve pair table.
    pub fn curve_pairs(&self) -> &PairTable {
        &self.curve_pairs
    }

    /// Number of bones in the skeleton the tables were built for.
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Fingerprint of the build inputs, if recorded.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Rules paired with their source bone, in skeleton order.
    pub fn rules(&self) -> impl Iterator<Item = (usize, &FlipRule)> {
        self.operate_bones
            .iter()
            .filter_map(|&bone| self.rule(bone).map(|rule| (bone, rule)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::IDENTITY_CHANNEL_MAP;
    use crate::transform::Transform;
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;
    use std::f32::consts::PI;

    fn skeleton() -> Skeleton {
        Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Spine", "Root", Transform::from_translation(Vec3::Z))
            .child(
                "Arm_L",
                "Spine",
                Transform::from_translation(Vec3::new(0.5, 0.0, 0.0)),
            )
            .child(
                "Arm_R",
                "Spine",
                Transform::from_rotation_translation(
                    Quat::from_rotation_z(PI),
                    Vec3::new(-0.5, 0.0, 0.0),
                ),
            )
            .child(
                "Pouch",
                "Spine",
                Transform::from_translation(Vec3::new(0.2, 0.1, 0.0)),
            )
            .curve("Smile_L")
            .curve("Smile_R")
            .curve("Jaw_Open")
            .build()
            .unwrap()
    }

    fn config() -> MirrorConfig {
        MirrorConfig::default().with_search_replace_pairs("_L,_R")
    }

    #[test]
    fn test_build_operate_bones() {
        let tables = MirrorTables::build(&skeleton(), &config());
        assert_eq!(tables.operate_bones(), &[0, 1, 2, 3]);
        assert!(tables.rule(4).is_none());
        assert_eq!(tables.bone_count(), 5);
    }

    #[test]
    fn test_build_rules_point_at_partner() {
        let tables = MirrorTables::build(&skeleton(), &config());
        assert_eq!(tables.rule(2).unwrap().mirror_bone, "Arm_R");
        assert_eq!(tables.rule(3).unwrap().mirror_bone, "Arm_L");
        assert_eq!(tables.rule(1).unwrap().mirror_index, 1);
        for (_, rule) in tables.rules() {
            assert!(rule.is_well_formed());
        }
    }

    #[test]
    fn test_build_half_turn_partner_signs() {
        let tables = MirrorTables::build(&skeleton(), &config());
        let rule = tables.rule(2).unwrap();
        assert_eq!(rule.channel_map, IDENTITY_CHANNEL_MAP);
        assert_eq!(rule.signs, [1, -1, 1, -1, 1, -1]);
        assert_eq!(tables.axes(3).unwrap().as_array(), [-1, -2, 3]);
    }

    #[test]
    fn test_build_curve_pairs() {
        let tables = MirrorTables::build(&skeleton(), &config());
        assert_eq!(tables.curve_pairs().get("Smile_R"), Some("Smile_L"));
        assert!(!tables.curve_pairs().contains("Jaw_Open"));
    }

    #[test]
    fn test_build_without_tokens_is_empty() {
        let tables = MirrorTables::build(&skeleton(), &config().with_search_replace_pairs(""));
        assert!(tables.operate_bones().is_empty());
        assert!(tables.bone_pairs().is_empty());
        assert!(tables.curve_pairs().is_empty());
    }

    #[test]
    fn test_empty_tables() {
        let tables = MirrorTables::empty(3);
        assert_eq!(tables.bone_count(), 3);
        assert!(tables.rules().next().is_none());
        assert!(tables.fingerprint().is_none());
        assert_eq!(tables.with_fingerprint("abc").fingerprint(), Some("abc"));
    }
}
