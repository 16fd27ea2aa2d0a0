use super::Triangle;
use crate::ops::Normal;
use crate::Real;
use math::Vector3;

/// An oriented plane `dot(normal, p) + distance = 0` with a unit normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<T: Real> {
    normal: Vector3<T>,
    distance: T,
}

impl<T: Real> Plane<T> {
    /// Build a plane from a unit normal and a point on the plane.
    pub fn from_normal_and_point(normal: Vector3<T>, point: [T; 3]) -> Self {
        let distance = -normal.dot(&Vector3::from(point));
        Plane { normal, distance }
    }

    /// Build the plane spanned by a triangle. Returns `None` if the triangle is degenerate.
    ///
    /// The normal follows the winding `0 -> 1 -> 2`.
    pub fn from_triangle(tri: &Triangle<T>) -> Option<Self> {
        let normal: Option<Vector3<T>> = tri.normal();
        normal.map(|n| Plane {
            normal: n,
            distance: -n.dot(&tri.0),
        })
    }

    #[inline]
    pub fn normal(&self) -> [T; 3] {
        self.normal.into()
    }

    #[inline]
    pub fn distance(&self) -> T {
        self.distance
    }

    #[inline]
    pub fn signed_distance(&self, p: [T; 3]) -> T {
        self.normal.dot(&Vector3::from(p)) + self.distance
    }

    /// Check whether the given point is strictly in front of the plane. Points on the plane are
    /// at the back.
    #[inline]
    pub fn is_front(&self, p: [T; 3]) -> bool {
        self.signed_distance(p) > T::zero()
    }
}
