//! Name-based mirror pairing for bones and curves.
//!
//! Pairing substitutes configured tokens in a name (`_l` → `_r` and back) and
//! accepts the first substituted name that exists. Tokens are tried longest
//! first so that `_left` wins over `_l` on `arm_left`. Bones that find no
//! partner but sit on the mirror plane in bind pose mirror themselves.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::config::{MirrorConfig, MirrorPlane};
use crate::skeleton::{NameIndex, Skeleton};

// =============================================================================
// Name Matcher
// =============================================================================

/// Ordered search/replace tokens plus skip substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMatcher {
    tokens: Vec<(String, String)>,
    skips: Vec<String>,
    case_sensitive: bool,
}

impl NameMatcher {
    /// Builds a matcher from the configuration.
    ///
    /// Every pair is registered in both directions. A token that appears in
    /// several pairs keeps its last replacement. Tokens are sorted by character
    /// count, longest first; equal lengths keep declaration order.
    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(
            config.token_pairs(),
            config.skip_tokens(),
            config.case_sensitive,
        )
    }

    /// Builds a matcher from explicit pairs and skips.
    pub fn new(pairs: Vec<(String, String)>, skips: Vec<String>, case_sensitive: bool) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut replacements: HashMap<String, String> = HashMap::new();
        for (search, replace) in pairs {
            for (from, to) in [(search.clone(), replace.clone()), (replace, search)] {
                if !replacements.contains_key(&from) {
                    order.push(from.clone());
                }
                replacements.insert(from, to);
            }
        }
        order.sort_by_key(|token| std::cmp::Reverse(token.chars().count()));

        let tokens = order
            .into_iter()
            .filter_map(|from| {
                let to = replacements.get(&from)?.clone();
                Some((from, to))
            })
            .collect();

        Self {
            tokens,
            skips,
            case_sensitive,
        }
    }

    /// Returns true if no search tokens are configured.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Search/replace tokens in priority order.
    pub fn tokens(&self) -> &[(String, String)] {
        &self.tokens
    }

    /// Returns true if the name contains any skip substring.
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skips
            .iter()
            .any(|skip| contains(name, skip, self.case_sensitive))
    }

    /// Substituted candidate names in priority order.
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        self.tokens.iter().filter_map(move |(search, replace)| {
            contains(name, search, self.case_sensitive)
                .then(|| replace_all(name, search, replace, self.case_sensitive))
        })
    }

    /// Whether names compare exactly.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

fn contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack
            .to_ascii_lowercase()
            .contains(&needle.to_ascii_lowercase())
    }
}

/// Replaces every non-overlapping occurrence of `search`.
///
/// ASCII case folding preserves byte offsets, so matches found in the folded
/// string index the original directly.
fn replace_all(haystack: &str, search: &str, replace: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        return haystack.replace(search, replace);
    }
    let folded = haystack.to_ascii_lowercase();
    let needle = search.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in folded.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replace);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    out
}

// =============================================================================
// Pair Table
// =============================================================================

/// Symmetric name→mirror-name table.
///
/// Inserting `a ↔ b` records both directions; unique pairs are also kept in
/// insertion order with the first-seen name on the left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairTable {
    map: HashMap<String, String>,
    order: Vec<(String, String)>,
}

impl PairTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `a ↔ b`. Returns false, leaving the table unchanged, if either
    /// name is already paired.
    pub fn insert_pair(&mut self, a: impl Into<String>, b: impl Into<String>) -> bool {
        let (a, b) = (a.into(), b.into());
        if self.map.contains_key(&a) || self.map.contains_key(&b) {
            return false;
        }
        self.map.insert(a.clone(), b.clone());
        self.map.insert(b.clone(), a.clone());
        self.order.push((a, b));
        true
    }

    /// Returns the mirror of a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Returns true if the name is paired.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of paired names (a self pair counts once).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is paired.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Unique pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

impl Serialize for PairTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.order.iter().map(|(a, b)| [a, b]))
    }
}

// =============================================================================
// Resolvers
// =============================================================================

/// Resolves mirror bones for the whole skeleton.
///
/// Bones are visited in hierarchy order. A bone already paired is not
/// resolved again, and a candidate that is already paired or equal to the bone
/// itself is rejected in favour of the next token. Skipped names are never
/// resolved and never accepted as a mirror. With no search tokens the table
/// stays empty.
pub fn resolve_bone_pairs(
    skeleton: &Skeleton,
    matcher: &NameMatcher,
    plane: MirrorPlane,
    plane_tolerance: f32,
) -> PairTable {
    let mut table = PairTable::new();
    if matcher.is_empty() {
        return table;
    }

    for (index, bone) in skeleton.bones().iter().enumerate() {
        if table.contains(&bone.name) || matcher.is_skipped(&bone.name) {
            continue;
        }

        let mirror = matcher.candidates(&bone.name).find_map(|candidate| {
            let found = skeleton.find_bone_with_case(&candidate, matcher.case_sensitive())?;
            let found_name = &skeleton.bone(found)?.name;
            let free = !table.contains(found_name) && !matcher.is_skipped(found_name);
            (found != index && free).then(|| found_name.clone())
        });

        if let Some(mirror) = mirror {
            table.insert_pair(bone.name.clone(), mirror);
        } else if lies_on_plane(skeleton, index, plane, plane_tolerance) {
            table.insert_pair(bone.name.clone(), bone.name.clone());
        }
    }
    table
}

/// Returns true if the bone's bind position is within `tolerance` of the plane.
pub fn lies_on_plane(skeleton: &Skeleton, index: usize, plane: MirrorPlane, tolerance: f32) -> bool {
    skeleton
        .component_bind(index)
        .is_some_and(|bind| bind.translation[plane.normal_axis()].abs() < tolerance)
}

/// Resolves mirror curves among the known curve names.
///
/// Curves never mirror themselves.
pub fn resolve_curve_pairs(curves: &NameIndex, matcher: &NameMatcher) -> PairTable {
    let mut table = PairTable::new();
    for (index, name) in curves.names().iter().enumerate() {
        if table.contains(name) || matcher.is_skipped(name) {
            continue;
        }
        let mirror = matcher.candidates(name).find_map(|candidate| {
            let found = curves.find(&candidate, matcher.case_sensitive())?;
            let found_name = curves.name(found)?;
            let free = !table.contains(found_name) && !matcher.is_skipped(found_name);
            (found != index && free).then(|| found_name.to_string())
        });
        if let Some(mirror) = mirror {
            table.insert_pair(name.clone(), mirror);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    fn matcher(pairs: &str, skips: &str) -> NameMatcher {
        NameMatcher::from_config(
            &MirrorConfig::default()
                .with_search_replace_pairs(pairs)
                .with_skip_substrings(skips),
        )
    }

    fn t(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_translation(Vec3::new(x, y, z))
    }

    #[test]
    fn test_tokens_sorted_longest_first() {
        let m = matcher("_l,_r,_left,_right", "");
        let order: Vec<&str> = m.tokens().iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["_right", "_left", "_l", "_r"]);
    }

    #[test]
    fn test_tokens_registered_both_ways() {
        let m = matcher("_L,_R", "");
        assert_eq!(
            m.tokens().to_vec(),
            vec![
                ("_L".to_string(), "_R".to_string()),
                ("_R".to_string(), "_L".to_string())
            ]
        );
    }

    #[test]
    fn test_candidates_prefer_longer_token() {
        let m = matcher("_l,_r,_left,_right", "");
        let candidates: Vec<String> = m.candidates("arm_left").collect();
        assert_eq!(candidates[0], "arm_right");
    }

    #[test]
    fn test_case_insensitive_replace_keeps_rest() {
        assert_eq!(replace_all("Arm_L_Upper", "_l", "_r", false), "Arm_r_Upper");
        assert_eq!(replace_all("Arm_L_Upper", "_l", "_r", true), "Arm_L_Upper");
        assert_eq!(replace_all("_l_l", "_L", "_R", false), "_R_R");
    }

    #[test]
    fn test_skip_matches_substring() {
        let m = matcher("_L,_R", "_Twist, Helper");
        assert!(m.is_skipped("Arm_L_Twist"));
        assert!(m.is_skipped("ik_helper_r"));
        assert!(!m.is_skipped("Arm_L"));
    }

    #[test]
    fn test_pair_table_symmetric_and_unique() {
        let mut table = PairTable::new();
        assert!(table.insert_pair("a_l", "a_r"));
        assert!(table.insert_pair("mid", "mid"));
        assert!(!table.insert_pair("a_r", "x"));
        assert_eq!(table.get("a_l"), Some("a_r"));
        assert_eq!(table.get("a_r"), Some("a_l"));
        assert_eq!(table.get("mid"), Some("mid"));
        assert_eq!(table.len(), 3);
        let pairs: Vec<(&str, &str)> = table.pairs().collect();
        assert_eq!(pairs, vec![("a_l", "a_r"), ("mid", "mid")]);
    }

    #[test]
    fn test_resolve_bone_pairs_scenario() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Spine", "Root", t(0.0, 0.0, 1.0))
            .child("Arm_L", "Spine", t(0.5, 0.0, 0.0))
            .child("Arm_R", "Spine", t(-0.5, 0.0, 0.0))
            .build()
            .unwrap();
        let table = resolve_bone_pairs(&skeleton, &matcher("_L,_R", ""), MirrorPlane::Yz, 0.001);

        let pairs: Vec<(&str, &str)> = table.pairs().collect();
        assert_eq!(
            pairs,
            vec![("Root", "Root"), ("Spine", "Spine"), ("Arm_L", "Arm_R")]
        );
    }

    #[test]
    fn test_resolve_off_plane_unmatched_bone_excluded() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Holster", "Root", t(0.3, 0.0, 1.0))
            .build()
            .unwrap();
        let table = resolve_bone_pairs(&skeleton, &matcher("_L,_R", ""), MirrorPlane::Yz, 0.001);
        assert!(table.contains("Root"));
        assert!(!table.contains("Holster"));
    }

    #[test]
    fn test_resolve_plane_selects_axis() {
        let skeleton = Skeleton::builder()
            .root("Root", t(0.5, 0.0, 0.0))
            .build()
            .unwrap();
        let m = matcher("_L,_R", "");
        assert!(resolve_bone_pairs(&skeleton, &m, MirrorPlane::Yz, 0.001).is_empty());
        assert!(resolve_bone_pairs(&skeleton, &m, MirrorPlane::Xz, 0.001).contains("Root"));
        assert!(resolve_bone_pairs(&skeleton, &m, MirrorPlane::Xy, 0.001).contains("Root"));
    }

    #[test]
    fn test_resolve_skips_twist_bones() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Arm_L", "Root", t(0.5, 0.0, 0.0))
            .child("Arm_R", "Root", t(-0.5, 0.0, 0.0))
            .child("Arm_L_Twist", "Arm_L", t(0.2, 0.0, 0.0))
            .child("Arm_R_Twist", "Arm_R", t(-0.2, 0.0, 0.0))
            .build()
            .unwrap();
        let table = resolve_bone_pairs(
            &skeleton,
            &matcher("_L,_R", "_Twist"),
            MirrorPlane::Yz,
            0.001,
        );
        assert!(table.contains("Arm_L"));
        assert!(!table.contains("Arm_L_Twist"));
        assert!(!table.contains("Arm_R_Twist"));
    }

    #[test]
    fn test_resolve_rejects_skipped_mirror() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .child("Arm_L_Helper", "Root", t(0.7, 0.0, 0.0))
            .child("Arm_R_Helper", "Root", t(-0.7, 0.0, 0.0))
            .build()
            .unwrap();
        let table = resolve_bone_pairs(
            &skeleton,
            &matcher("_L,_R", "_R_Helper"),
            MirrorPlane::Yz,
            0.001,
        );
        assert!(table.contains("Root"));
        assert!(!table.contains("Arm_L_Helper"));
        assert!(!table.contains("Arm_R_Helper"));
    }

    #[test]
    fn test_resolve_curve_rejects_skipped_mirror() {
        let curves =
            NameIndex::new(["Brow_L_Helper", "Brow_R_Helper", "Smile_L", "Smile_R"]).unwrap();
        let table = resolve_curve_pairs(&curves, &matcher("_L,_R", "_R_Helper"));
        assert!(!table.contains("Brow_L_Helper"));
        assert!(!table.contains("Brow_R_Helper"));
        assert_eq!(table.get("Smile_L"), Some("Smile_R"));
    }

    #[test]
    fn test_tokens_sorted_by_character_count() {
        let m = matcher("_äää,_ööö,_left,_right", "");
        let order: Vec<&str> = m.tokens().iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["_right", "_left", "_äää", "_ööö"]);
    }

    #[test]
    fn test_resolve_case_insensitive_returns_canonical_name() {
        let skeleton = Skeleton::builder()
            .root("root", Transform::IDENTITY)
            .child("hand_l", "root", t(0.5, 0.0, 0.0))
            .child("hand_R", "root", t(-0.5, 0.0, 0.0))
            .build()
            .unwrap();
        let table = resolve_bone_pairs(&skeleton, &matcher("_l,_r", ""), MirrorPlane::Yz, 0.001);
        assert_eq!(table.get("hand_l"), Some("hand_R"));
        assert_eq!(table.get("hand_R"), Some("hand_l"));
    }

    #[test]
    fn test_resolve_case_sensitive_misses() {
        let skeleton = Skeleton::builder()
            .root("root", Transform::IDENTITY)
            .child("hand_l", "root", t(0.5, 0.0, 0.0))
            .child("hand_R", "root", t(-0.5, 0.0, 0.0))
            .build()
            .unwrap();
        let config = MirrorConfig::default()
            .with_search_replace_pairs("_l,_r")
            .with_case_sensitive(true);
        let m = NameMatcher::from_config(&config);
        assert!(m.case_sensitive());
        let table = resolve_bone_pairs(&skeleton, &m, MirrorPlane::Yz, 0.001);
        assert!(!table.contains("hand_l"));
        assert!(!table.contains("hand_R"));
    }

    #[test]
    fn test_resolve_empty_tokens_is_empty() {
        let skeleton = Skeleton::builder()
            .root("Root", Transform::IDENTITY)
            .build()
            .unwrap();
        let table = resolve_bone_pairs(&skeleton, &matcher("", ""), MirrorPlane::Yz, 0.001);
        assert!(table.is_empty());
    }

    #[test]
    fn test_resolve_curve_pairs() {
        let curves = NameIndex::new(["Smile_L", "Smile_R", "Jaw_Open", "Blink_L"]).unwrap();
        let table = resolve_curve_pairs(&curves, &matcher("_L,_R", ""));
        assert_eq!(table.get("Smile_L"), Some("Smile_R"));
        assert_eq!(table.get("Smile_R"), Some("Smile_L"));
        assert!(!table.contains("Jaw_Open"));
        assert!(!table.contains("Blink_L"));
    }

    #[test]
    fn test_pair_table_serializes_as_pairs() {
        let mut table = PairTable::new();
        table.insert_pair("a_l", "a_r");
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"[["a_l","a_r"]]"#);
    }
}
