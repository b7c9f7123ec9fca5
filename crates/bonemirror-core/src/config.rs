//! Mirror node configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Search/replace token pairs used when no configuration is given.
pub const DEFAULT_SEARCH_REPLACE_PAIRS: &str =
    "_l,_r,_lt,_rt,_left,_right,L_,R_,_L_,_R_,Left,Right";

/// Absolute distance from the mirror plane within which a bone mirrors itself.
pub const DEFAULT_PLANE_TOLERANCE: f32 = 0.001;

/// Delimiter for the token lists.
pub const LIST_DELIMITER: char = ',';

// =============================================================================
// Mirror Plane
// =============================================================================

/// Axis-aligned reflection plane through the skeleton origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorPlane {
    /// The XZ plane; reflects Y.
    Xz,
    /// The YZ plane; reflects X (side-to-side for X-lateral skeletons).
    #[default]
    Yz,
    /// The XY plane; reflects Z.
    Xy,
}

impl MirrorPlane {
    /// All planes, in declaration order.
    pub const ALL: [MirrorPlane; 3] = [MirrorPlane::Xz, MirrorPlane::Yz, MirrorPlane::Xy];

    /// Returns the plane name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorPlane::Xz => "xz",
            MirrorPlane::Yz => "yz",
            MirrorPlane::Xy => "xy",
        }
    }

    /// Index of the world axis normal to the plane (0 = X, 1 = Y, 2 = Z).
    pub fn normal_axis(&self) -> usize {
        match self {
            MirrorPlane::Xz => 1,
            MirrorPlane::Yz => 0,
            MirrorPlane::Xy => 2,
        }
    }

    /// Base sign per world translation axis: only the normal axis is negated.
    pub fn translation_signs(&self) -> [i8; 3] {
        let mut signs = [1; 3];
        signs[self.normal_axis()] = -1;
        signs
    }

    /// Base sign per world rotation axis (roll, pitch, yaw).
    ///
    /// Rotation is an axial quantity, so the component about the normal axis
    /// survives the reflection and the two in-plane components are negated.
    pub fn rotation_signs(&self) -> [i8; 3] {
        let mut signs = [-1; 3];
        signs[self.normal_axis()] = 1;
        signs
    }
}

impl std::fmt::Display for MirrorPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MirrorPlane {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xz" | "xz_plane" => Ok(MirrorPlane::Xz),
            "yz" | "yz_plane" => Ok(MirrorPlane::Yz),
            "xy" | "xy_plane" => Ok(MirrorPlane::Xy),
            _ => Err(ConfigError::UnknownPlane(s.to_string())),
        }
    }
}

// =============================================================================
// Mirror Config
// =============================================================================

/// Configuration consumed when the mirror tables are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    /// Reflection plane.
    #[serde(default)]
    pub plane: MirrorPlane,
    /// Comma-delimited `search,replace` token pairs.
    #[serde(default = "default_search_replace_pairs")]
    pub search_replace_pairs: String,
    /// Comma-delimited substrings; matching names are never paired.
    #[serde(default)]
    pub skip_substrings: String,
    /// When false the node is a pass-through and no tables are built.
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Self-mirror tolerance against the plane, in skeleton units.
    #[serde(default = "default_plane_tolerance")]
    pub plane_tolerance: f32,
    /// Compare names exactly instead of ignoring ASCII case.
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_search_replace_pairs() -> String {
    DEFAULT_SEARCH_REPLACE_PAIRS.to_string()
}

fn default_true() -> bool {
    true
}

fn default_plane_tolerance() -> f32 {
    DEFAULT_PLANE_TOLERANCE
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            plane: MirrorPlane::default(),
            search_replace_pairs: default_search_replace_pairs(),
            skip_substrings: String::new(),
            enable: true,
            plane_tolerance: DEFAULT_PLANE_TOLERANCE,
            case_sensitive: false,
        }
    }
}

impl MirrorConfig {
    /// Creates the default configuration for a plane.
    pub fn new(plane: MirrorPlane) -> Self {
        Self {
            plane,
            ..Self::default()
        }
    }

    /// Sets the search/replace pairs.
    pub fn with_search_replace_pairs(mut self, pairs: impl Into<String>) -> Self {
        self.search_replace_pairs = pairs.into();
        self
    }

    /// Sets the skip substrings.
    pub fn with_skip_substrings(mut self, skips: impl Into<String>) -> Self {
        self.skip_substrings = skips.into();
        self
    }

    /// Sets the enable flag.
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Sets the self-mirror plane tolerance.
    pub fn with_plane_tolerance(mut self, tolerance: f32) -> Self {
        self.plane_tolerance = tolerance;
        self
    }

    /// Sets case-sensitive name matching.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Parsed search/replace pairs, in declaration order.
    ///
    /// A trailing unpaired token is dropped.
    pub fn token_pairs(&self) -> Vec<(String, String)> {
        let tokens = split_list(&self.search_replace_pairs);
        tokens
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }

    /// Parsed skip substrings.
    pub fn skip_tokens(&self) -> Vec<String> {
        split_list(&self.skip_substrings)
    }

    /// Checks values that serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.plane_tolerance.is_finite() || self.plane_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.plane_tolerance));
        }
        Ok(())
    }
}

/// Splits a delimited list, removing all whitespace and empty entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(LIST_DELIMITER)
        .map(|token| token.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plane_sign_patterns() {
        assert_eq!(MirrorPlane::Xz.translation_signs(), [1, -1, 1]);
        assert_eq!(MirrorPlane::Xz.rotation_signs(), [-1, 1, -1]);
        assert_eq!(MirrorPlane::Yz.translation_signs(), [-1, 1, 1]);
        assert_eq!(MirrorPlane::Yz.rotation_signs(), [1, -1, -1]);
        assert_eq!(MirrorPlane::Xy.translation_signs(), [1, 1, -1]);
        assert_eq!(MirrorPlane::Xy.rotation_signs(), [-1, -1, 1]);
    }

    #[test]
    fn test_plane_sign_counts() {
        for plane in MirrorPlane::ALL {
            let t_neg = plane.translation_signs().iter().filter(|s| **s < 0).count();
            let r_neg = plane.rotation_signs().iter().filter(|s| **s < 0).count();
            assert_eq!(t_neg, 1, "{plane}");
            assert_eq!(r_neg, 2, "{plane}");
        }
    }

    #[test]
    fn test_plane_from_str() {
        assert_eq!("xz".parse::<MirrorPlane>().unwrap(), MirrorPlane::Xz);
        assert_eq!("YZ".parse::<MirrorPlane>().unwrap(), MirrorPlane::Yz);
        assert_eq!("XY_Plane".parse::<MirrorPlane>().unwrap(), MirrorPlane::Xy);
        assert_eq!(
            "zz".parse::<MirrorPlane>(),
            Err(ConfigError::UnknownPlane("zz".to_string()))
        );
    }

    #[test]
    fn test_split_list_strips_whitespace_and_empties() {
        assert_eq!(
            split_list(" _L , _R,, Left ,"),
            vec!["_L".to_string(), "_R".to_string(), "Left".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_token_pairs_drop_odd_tail() {
        let config = MirrorConfig::default().with_search_replace_pairs("_L,_R,Left");
        assert_eq!(
            config.token_pairs(),
            vec![("_L".to_string(), "_R".to_string())]
        );
    }

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert_eq!(config.plane, MirrorPlane::Yz);
        assert!(config.enable);
        assert_eq!(config.token_pairs().len(), 6);
        assert!(config.skip_tokens().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: MirrorConfig =
            serde_json::from_str(r#"{"plane":"xz","skip_substrings":"_Twist"}"#).unwrap();
        assert_eq!(config.plane, MirrorPlane::Xz);
        assert_eq!(config.skip_tokens(), vec!["_Twist".to_string()]);
        assert_eq!(config.search_replace_pairs, DEFAULT_SEARCH_REPLACE_PAIRS);
        assert_eq!(config.plane_tolerance, DEFAULT_PLANE_TOLERANCE);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result: Result<MirrorConfig, _> = serde_json::from_str(r#"{"mirror_axis":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_tolerance() {
        let config = MirrorConfig::default().with_plane_tolerance(-0.5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTolerance(-0.5))
        );
        assert!(MirrorConfig::default()
            .with_plane_tolerance(f32::NAN)
            .validate()
            .is_err());
    }
}
