//! Index types and counting traits for submeshed triangle meshes.
//!
//! A mesh is a pool of vertices and a list of submeshes. Each submesh is a run of triangles and
//! each triangle refers to three vertices of the pool. The index types below make it explicit
//! which of these collections an integer indexes into.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! impl_index_type {
    ($index_type:ident) => {
        /// Define index type
        #[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $index_type(usize);

        impl $index_type {
            #[inline]
            pub fn into_inner(self) -> usize {
                self.0
            }
        }

        impl From<$index_type> for usize {
            #[inline]
            fn from(i: $index_type) -> usize {
                i.0
            }
        }

        impl From<usize> for $index_type {
            #[inline]
            fn from(i: usize) -> Self {
                $index_type(i)
            }
        }

        impl fmt::Display for $index_type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// Indices within a mesh.
impl_index_type!(VertexIndex);
impl_index_type!(SubmeshIndex);
impl_index_type!(BoneIndex);

// Index of a triangle within its submesh.
impl_index_type!(TriangleIndex);

// Simple quantifiers
pub trait NumVertices {
    fn num_vertices(&self) -> usize;
}
pub trait NumSubmeshes {
    fn num_submeshes(&self) -> usize;
}
pub trait NumTriangles {
    /// Total number of triangles over all submeshes.
    fn num_triangles(&self) -> usize;
}
