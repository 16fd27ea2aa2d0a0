//!
//! This module implements the transform ops from `meshsplit::ops::transform` for the vertex pools
//! of meshes.
//!

use super::vertex_positions::VertexPositions;
use crate::ops::transform::*;
use crate::Real;

use math::{Matrix3, RealField, Vector3};

impl<T: RealField, M: VertexPositions<Element = [T; 3]>> Scale<T> for M {
    /// Scale a mesh in 3D by a given vector of scale factors.
    /// `s = [1.0; 3]` corresponds to a noop.
    fn scale(&mut self, [x, y, z]: [T; 3]) {
        for p in self.vertex_position_iter_mut() {
            p[0] *= x.clone();
            p[1] *= y.clone();
            p[2] *= z.clone();
        }
    }
}

impl<T: RealField + Copy, M: VertexPositions<Element = [T; 3]>> Rotate<T> for M {
    /// Rotate the mesh using the given column-major rotation matrix.
    fn rotate_by_matrix(&mut self, mtx: [[T; 3]; 3]) {
        let mtx = Matrix3::from(mtx);
        for p in self.vertex_position_iter_mut() {
            let pos = Vector3::from(*p);
            *p = (mtx * pos).into();
        }
    }
}

impl<T: RealField, M: VertexPositions<Element = [T; 3]>> Translate<T> for M {
    /// Translate the mesh by the given translation vector (displacement) `t`.
    fn translate(&mut self, [x, y, z]: [T; 3]) {
        for p in self.vertex_position_iter_mut() {
            p[0] += x.clone();
            p[1] += y.clone();
            p[2] += z.clone();
        }
    }
}

/// Bake an object-to-world transform into the vertex pool of a mesh.
pub fn apply_transform<T: Real, M: VertexPositions<Element = [T; 3]>>(
    mesh: &mut M,
    xform: &Transform<T>,
) {
    for p in mesh.vertex_position_iter_mut() {
        *p = xform.transform_point(*p);
    }
}
