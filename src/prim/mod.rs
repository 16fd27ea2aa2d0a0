//! Geometric primitives used to classify triangles.

pub mod plane;
pub mod triangle;

pub use plane::*;
pub use triangle::*;
