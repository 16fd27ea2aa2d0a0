//! Skin bindings: per-vertex primary bone influences and the bone list they refer to.

use crate::error::{ElementKind, Error};
use crate::mesh::topology::BoneIndex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many bones may influence a single vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoneWeightLayout {
    /// The mesh is not skinned.
    None,
    /// One or a small fixed number of bones per vertex. The dominant one is the primary bone.
    Limited,
    /// An unbounded number of influences per vertex. Splitting by bone is not supported for this
    /// layout.
    Unlimited,
}

impl Default for BoneWeightLayout {
    fn default() -> Self {
        BoneWeightLayout::None
    }
}

/// Identity of a skeleton joint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneRef(String);

impl BoneRef {
    pub fn new(name: impl Into<String>) -> BoneRef {
        BoneRef(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoneRef {
    fn from(name: &str) -> BoneRef {
        BoneRef::new(name)
    }
}

impl fmt::Display for BoneRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The dominant bone influencing a vertex along with its weight.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneWeight {
    /// Position of the bone in the mesh's bone list.
    pub bone: BoneIndex,
    pub weight: f32,
}

impl BoneWeight {
    pub fn new(bone: usize, weight: f32) -> BoneWeight {
        BoneWeight {
            bone: bone.into(),
            weight,
        }
    }
}

/// Skinning data bound to the vertices of a mesh.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Skin {
    layout: BoneWeightLayout,
    primary: Vec<BoneWeight>,
    bones: Vec<BoneRef>,
}

impl Skin {
    /// Build a skin from one primary bone weight per vertex and the bone list.
    pub fn new(layout: BoneWeightLayout, primary: Vec<BoneWeight>, bones: Vec<BoneRef>) -> Skin {
        Skin {
            layout,
            primary,
            bones,
        }
    }

    #[inline]
    pub fn layout(&self) -> BoneWeightLayout {
        self.layout
    }

    /// Primary bone weights, one per vertex.
    #[inline]
    pub fn primary_weights(&self) -> &[BoneWeight] {
        &self.primary
    }

    #[inline]
    pub fn bones(&self) -> &[BoneRef] {
        &self.bones
    }

    /// Find the position of the given bone in the bone list.
    pub fn find_bone(&self, bone: &BoneRef) -> Result<BoneIndex, Error> {
        self.bones
            .iter()
            .position(|b| b == bone)
            .map(BoneIndex::from)
            .ok_or_else(|| Error::BoneNotFound(bone.name().to_owned()))
    }

    /// Check that this skin can be bound to a mesh with `num_vertices` vertices.
    pub(crate) fn validate(&self, num_vertices: usize) -> Result<(), Error> {
        // Unskinned and unbounded layouts carry no per-vertex primary bone.
        if self.layout != BoneWeightLayout::Limited {
            return Ok(());
        }
        if self.primary.len() != num_vertices {
            return Err(Error::SizeMismatch {
                kind: ElementKind::BoneWeight,
                expected: num_vertices,
                given: self.primary.len(),
            });
        }
        Ok(())
    }
}
