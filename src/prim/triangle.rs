use crate::ops::*;
use crate::Real;
use math::Vector3;

/// Generic triangle with three points
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<T: Real>(pub Vector3<T>, pub Vector3<T>, pub Vector3<T>);

impl<T: Real> Triangle<T> {
    /// Build a new triangle from an array of vertex positions.
    #[inline]
    pub fn new([a, b, c]: [[T; 3]; 3]) -> Self {
        Triangle(a.into(), b.into(), c.into())
    }

    /// Convert this triangle into an array of vertex positions.
    #[inline]
    pub fn into_array(self) -> [[T; 3]; 3] {
        [self.0.into(), self.1.into(), self.2.into()]
    }

    /// Apply the given transform to each vertex.
    #[inline]
    pub fn transformed(self, xform: &Transform<T>) -> Triangle<T> {
        let [a, b, c] = self.into_array();
        Triangle::new([
            xform.transform_point(a),
            xform.transform_point(b),
            xform.transform_point(c),
        ])
    }

    /// Compute the area weighted normal of this triangle.
    ///
    /// The normal follows the winding order `0 -> 1 -> 2` with the right hand rule. Its norm is
    /// twice the area of the triangle.
    #[inline]
    pub fn area_normal(&self) -> Vector3<T> {
        (self.1 - self.0).cross(&(self.2 - self.0))
    }
}

impl<T: Real> Normal<Option<Vector3<T>>> for &Triangle<T> {
    /// Unit normal of the triangle, `None` if the triangle is degenerate.
    #[inline]
    fn normal(self) -> Option<Vector3<T>> {
        let nml = self.area_normal();
        let norm = nml.norm();
        if norm > T::zero() {
            Some(nml / norm)
        } else {
            None
        }
    }
}
