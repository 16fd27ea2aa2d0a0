//! A mesh splitting library for partitioning indexed triangle meshes into derived meshes.
//!
//! # Overview
//!
//! A [`Mesh`] is a shared vertex pool plus a list of submeshes, each a run of triangles
//! referencing the pool by index. This library classifies every triangle with one of three rules
//! and regroups the triangles into new meshes that keep the submesh layout of the source:
//!
//!  - by material, where each submesh becomes a standalone single-material mesh,
//!  - by plane side, where triangles touching the front of a cut plane go to one output,
//!  - by bone weight, where triangles touching a bone's vertices go to one output.
//!
//! Vertex pools are copied through untouched, so indices in the outputs stay valid.
//!
//! The [`scene`] module wires the splits to external collaborators (asset storage, scene
//! objects, progress reporting) and the [`io`] module provides an OBJ backed asset store.

pub mod error;
pub mod ops;
pub mod options;
pub mod prim;
pub mod progress;

pub mod algo;
pub mod mesh;
pub mod scene;

#[cfg(feature = "io")]
pub mod io;

// public re-exports
pub use crate::algo::{Bucket, Classifier, Parts, SplitPair, SplitRule};
pub use crate::error::Error;
pub use crate::mesh::*;
pub use crate::ops::transform::Transform;
pub use crate::options::SplitOptions;

/// Plain old data trait. Types that implement this trait contain no references and can be copied
/// with `memcpy`.
pub trait Pod: 'static + Copy + Sized + Send + Sync + std::any::Any {}
impl<T> Pod for T where T: 'static + Copy + Sized + Send + Sync + std::any::Any {}

/// Scalar type used for vertex positions and transforms.
pub trait Real:
    math::RealField + num_traits::Float + ::std::fmt::Debug + std::iter::Sum + Pod
{
}
impl<T> Real for T where
    T: math::RealField + num_traits::Float + ::std::fmt::Debug + std::iter::Sum + Pod
{
}
