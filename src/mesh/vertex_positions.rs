//!
//! This module defines the `VertexPositions` trait, the core intrinsic attribute of every mesh:
//! the shared vertex pool that triangles index into.
//!

use crate::mesh::topology::*;
use std::slice::{Iter, IterMut};

/// An "intrinsic" trait for accessing vertex positions on a mesh.
pub trait VertexPositions {
    type Element: Copy;

    /// Vertex positions as a slice of triplets.
    fn vertex_positions(&self) -> &[Self::Element];

    /// Vertex positions as a mutable slice of triplets.
    fn vertex_positions_mut(&mut self) -> &mut [Self::Element];

    /// Vertex iterator.
    #[inline]
    fn vertex_position_iter(&self) -> Iter<Self::Element> {
        self.vertex_positions().iter()
    }

    /// Mutable vertex iterator.
    #[inline]
    fn vertex_position_iter_mut(&mut self) -> IterMut<Self::Element> {
        self.vertex_positions_mut().iter_mut()
    }

    /// Vertex accessor, `None` if the index is out of bounds.
    #[inline]
    fn get_vertex_position<VI>(&self, vidx: VI) -> Option<Self::Element>
    where
        VI: Into<VertexIndex>,
    {
        self.vertex_positions()
            .get(usize::from(vidx.into()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, Submesh};

    #[test]
    fn vertex_position_access() {
        let pos = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let mut mesh = Mesh::new(pos, vec![Submesh::new(vec![[0, 1, 2]])]).unwrap();

        assert_eq!(mesh.get_vertex_position(2), Some([1.0, 0.0, 0.0]));
        assert_eq!(mesh.get_vertex_position(3), None);

        for p in mesh.vertex_position_iter_mut() {
            p[1] = 2.0;
        }
        assert!(mesh.vertex_position_iter().all(|p| p[1] == 2.0));
    }
}
