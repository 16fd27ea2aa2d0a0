//! A submesh is an ordered run of triangles referencing a shared vertex pool.

use crate::error::Error;
use crate::mesh::topology::TriangleIndex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::slice::Iter;

/// An ordered list of triangles. Each triangle is a triplet of vertex indices into the vertex pool
/// of the owning mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Submesh {
    triangles: Vec<[usize; 3]>,
}

impl Submesh {
    pub fn new(triangles: Vec<[usize; 3]>) -> Submesh {
        Submesh { triangles }
    }

    /// Build a submesh from a flat list of indices where every consecutive triple forms a
    /// triangle.
    ///
    /// `submesh` is only used to report which submesh was malformed.
    pub fn from_flat_indices(indices: &[usize], submesh: usize) -> Result<Submesh, Error> {
        if indices.len() % 3 != 0 {
            return Err(Error::MalformedTriangleList {
                submesh,
                len: indices.len(),
            });
        }
        Ok(Submesh {
            triangles: indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
        })
    }

    #[inline]
    pub(crate) fn push(&mut self, triangle: [usize; 3]) {
        self.triangles.push(triangle);
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangle accessor.
    #[inline]
    pub fn triangle<TI: Into<TriangleIndex>>(&self, tidx: TI) -> Option<&[usize; 3]> {
        self.triangles.get(usize::from(tidx.into()))
    }

    /// Return a slice of individual triangles.
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        self.triangles.as_slice()
    }

    /// Iterate over each triangle.
    #[inline]
    pub fn triangle_iter(&self) -> Iter<[usize; 3]> {
        self.triangles.iter()
    }

    /// Flat view of the triangle list. The length is always a multiple of 3.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        bytemuck::cast_slice(self.triangles.as_slice())
    }

    /// Largest vertex index referenced by this submesh.
    pub(crate) fn max_index(&self) -> Option<usize> {
        self.indices().iter().copied().max()
    }
}

impl From<Vec<[usize; 3]>> for Submesh {
    fn from(triangles: Vec<[usize; 3]>) -> Submesh {
        Submesh::new(triangles)
    }
}
