//! Per-frame pose and curve buffers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// Local (parent-relative) bone transforms, indexed like the skeleton.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    transforms: Vec<Transform>,
}

impl Pose {
    /// The skeleton's bind pose.
    pub fn bind(skeleton: &Skeleton) -> Self {
        Self {
            transforms: skeleton.bones().iter().map(|b| b.bind).collect(),
        }
    }

    /// Wraps existing transforms.
    pub fn from_transforms(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }

    /// Number of bone slots.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if there are no bone slots.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Returns the transform of a bone, if the pose has that slot.
    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.transforms.get(index)
    }

    /// Writes a bone transform. Returns false if the slot does not exist.
    pub fn set(&mut self, index: usize, transform: Transform) -> bool {
        match self.transforms.get_mut(index) {
            Some(slot) => {
                *slot = transform;
                true
            }
            None => false,
        }
    }

    /// All transforms.
    pub fn as_slice(&self) -> &[Transform] {
        &self.transforms
    }
}

/// Named scalar curve values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveSet {
    values: BTreeMap<String, f32>,
}

impl CurveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve value.
    pub fn with_value(mut self, name: impl Into<String>, value: f32) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Returns a curve value.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    /// Sets a curve value.
    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.values.insert(name.into(), value);
    }

    /// Number of curves with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no curve has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates curves in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for CurveSet {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Pose and curves evaluated together for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseContext {
    /// Local bone transforms.
    pub pose: Pose,
    /// Curve values.
    #[serde(default)]
    pub curves: CurveSet,
}

impl PoseContext {
    /// Creates a context.
    pub fn new(pose: Pose, curves: CurveSet) -> Self {
        Self { pose, curves }
    }

    /// Bind pose with no curve values.
    pub fn bind(skeleton: &Skeleton) -> Self {
        Self::new(Pose::bind(skeleton), CurveSet::new())
    }
}
