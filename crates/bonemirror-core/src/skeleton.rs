//! Reference skeleton: bone hierarchy, bind pose and known curve names.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, SkeletonError};
use crate::transform::{default_scale, Transform};

// =============================================================================
// Name Index
// =============================================================================

/// Name lookup that can ignore ASCII case and returns the stored spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
    names: Vec<String>,
}

impl NameIndex {
    /// Builds an index. Fails on the first name that collides ignoring case.
    pub fn new<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = NameIndex::default();
        for name in names {
            let name = name.into();
            let id = index.names.len();
            if index.folded.insert(name.to_ascii_lowercase(), id).is_some() {
                return Err(name);
            }
            index.exact.insert(name.clone(), id);
            index.names.push(name);
        }
        Ok(index)
    }

    /// Finds a name, returning its position.
    pub fn find(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        if case_sensitive {
            self.exact.get(name).copied()
        } else {
            self.folded.get(&name.to_ascii_lowercase()).copied()
        }
    }

    /// Returns the stored spelling at a position.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Returns all names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// Bones
// =============================================================================

/// One bone of the reference skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoneRecord", into = "BoneRecord")]
pub struct BoneInfo {
    /// Unique bone name.
    pub name: String,
    /// Index of the parent bone; `None` for roots.
    pub parent: Option<usize>,
    /// Parent-relative bind transform.
    pub bind: Transform,
}

/// Flat document form of a bone; the bind transform fields sit beside the name.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoneRecord {
    name: String,
    #[serde(default)]
    parent: Option<usize>,
    #[serde(default)]
    translation: Vec3,
    #[serde(default)]
    rotation: Quat,
    #[serde(default = "default_scale")]
    scale: Vec3,
}

impl From<BoneRecord> for BoneInfo {
    fn from(record: BoneRecord) -> Self {
        Self {
            name: record.name,
            parent: record.parent,
            bind: Transform::new(record.translation, record.rotation, record.scale),
        }
    }
}

impl From<BoneInfo> for BoneRecord {
    fn from(bone: BoneInfo) -> Self {
        Self {
            name: bone.name,
            parent: bone.parent,
            translation: bone.bind.translation,
            rotation: bone.bind.rotation,
            scale: bone.bind.scale,
        }
    }
}

impl BoneInfo {
    /// Creates a bone.
    pub fn new(name: impl Into<String>, parent: Option<usize>, bind: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            bind,
        }
    }
}

/// Serialized form of a [`Skeleton`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkeletonDocument {
    /// Bones, parents before children.
    pub bones: Vec<BoneInfo>,
    /// Known animation curve names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub curves: Vec<String>,
}

// =============================================================================
// Skeleton
// =============================================================================

/// Validated reference skeleton.
///
/// Component-space bind transforms are computed once on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SkeletonDocument", into = "SkeletonDocument")]
pub struct Skeleton {
    bones: Vec<BoneInfo>,
    component_bind: Vec<Transform>,
    bone_index: NameIndex,
    curve_index: NameIndex,
}

impl Skeleton {
    /// Creates a skeleton from bones and curve names.
    ///
    /// Bones must be ordered so that every parent precedes its children.
    pub fn new(bones: Vec<BoneInfo>, curves: Vec<String>) -> Result<Self, SkeletonError> {
        for (index, bone) in bones.iter().enumerate() {
            if bone.name.is_empty() {
                return Err(SkeletonError::EmptyName(index));
            }
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(SkeletonError::InvalidParent {
                        bone: bone.name.clone(),
                        parent,
                    });
                }
            }
        }

        let bone_index = NameIndex::new(bones.iter().map(|b| b.name.clone()))
            .map_err(SkeletonError::DuplicateBone)?;
        let curve_index = NameIndex::new(curves).map_err(SkeletonError::DuplicateCurve)?;

        let mut component_bind: Vec<Transform> = Vec::with_capacity(bones.len());
        for bone in &bones {
            let component = match bone.parent {
                Some(parent) => bone.bind * component_bind[parent],
                None => bone.bind,
            };
            component_bind.push(component);
        }

        Ok(Self {
            bones,
            component_bind,
            bone_index,
            curve_index,
        })
    }

    /// Starts a name-based skeleton builder.
    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::default()
    }

    /// Parses a skeleton document from JSON.
    pub fn from_json(json: &str) -> Result<Self, MirrorError> {
        let doc: SkeletonDocument = serde_json::from_str(json)?;
        Ok(Self::try_from(doc)?)
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Returns true if the skeleton has no bones.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// All bones in hierarchy order.
    pub fn bones(&self) -> &[BoneInfo] {
        &self.bones
    }

    /// Returns a bone by index.
    pub fn bone(&self, index: usize) -> Option<&BoneInfo> {
        self.bones.get(index)
    }

    /// Returns a bone's parent-relative bind transform.
    pub fn local_bind(&self, index: usize) -> Option<&Transform> {
        self.bones.get(index).map(|b| &b.bind)
    }

    /// Returns a bone's component-space bind transform.
    pub fn component_bind(&self, index: usize) -> Option<&Transform> {
        self.component_bind.get(index)
    }

    /// Finds a bone index by exact name.
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bone_index.find(name, true)
    }

    /// Finds a bone index, optionally ignoring ASCII case.
    pub fn find_bone_with_case(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.bone_index.find(name, case_sensitive)
    }

    /// Known curve names, in declaration order.
    pub fn curve_names(&self) -> &[String] {
        self.curve_index.names()
    }

    /// Curve name lookup.
    pub fn curve_index(&self) -> &NameIndex {
        &self.curve_index
    }
}

impl TryFrom<SkeletonDocument> for Skeleton {
    type Error = SkeletonError;

    fn try_from(doc: SkeletonDocument) -> Result<Self, Self::Error> {
        Skeleton::new(doc.bones, doc.curves)
    }
}

impl From<Skeleton> for SkeletonDocument {
    fn from(skeleton: Skeleton) -> Self {
        SkeletonDocument {
            curves: skeleton.curve_index.names().to_vec(),
            bones: skeleton.bones,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`Skeleton`] by referring to parents by name.
#[derive(Debug, Clone, Default)]
pub struct SkeletonBuilder {
    bones: Vec<(String, Option<String>, Transform)>,
    curves: Vec<String>,
}

impl SkeletonBuilder {
    /// Adds a root bone.
    pub fn root(mut self, name: impl Into<String>, bind: Transform) -> Self {
        self.bones.push((name.into(), None, bind));
        self
    }

    /// Adds a bone under a previously added parent.
    pub fn child(
        mut self,
        name: impl Into<String>,
        parent: impl Into<String>,
        bind: Transform,
    ) -> Self {
        self.bones.push((name.into(), Some(parent.into()), bind));
        self
    }

    /// Adds a curve name.
    pub fn curve(mut self, name: impl Into<String>) -> Self {
        self.curves.push(name.into());
        self
    }

    /// Resolves parent names and validates the skeleton.
    pub fn build(self) -> Result<Skeleton, SkeletonError> {
        let mut bones: Vec<BoneInfo> = Vec::with_capacity(self.bones.len());
        for (name, parent, bind) in self.bones {
            let parent = match parent {
                Some(parent_name) => Some(
                    bones
                        .iter()
                        .position(|b| b.name == parent_name)
                        .ok_or_else(|| SkeletonError::UnknownParent {
                            bone: name.clone(),
                            parent: parent_name,
                        })?,
                ),
                None => None,
            };
            bones.push(BoneInfo::new(name, parent, bind));
        }
        Skeleton::new(bones, self.curves)
    }
}
