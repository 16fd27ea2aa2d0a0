//!
//! This module defines object-to-world transforms along with a number of transformation traits
//! that can be applied to geometrical objects like meshes and transforms themselves.
//!

use crate::ops::Skew;
use crate::Real;
use math::{Matrix3, Matrix4, Point3, RealField, Scalar, Vector3};
use num_traits::Zero;
use std::ops::Neg;

/// An object-to-world transform stored as a homogeneous 4x4 matrix.
///
/// Points are transformed projectively, so any affine transform (translation, rotation, non
/// uniform scale, shear) is supported.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_all", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform<T: Real> {
    matrix: Matrix4<T>,
}

impl<T: Real> Transform<T> {
    pub fn identity() -> Self {
        Transform {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<T>) -> Self {
        Transform { matrix }
    }

    /// Build a transform from a column-major homogeneous matrix.
    pub fn from_columns(columns: [[T; 4]; 4]) -> Self {
        Transform {
            matrix: Matrix4::from(columns),
        }
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<T> {
        &self.matrix
    }

    /// Transform a point from object space to world space.
    #[inline]
    pub fn transform_point(&self, p: [T; 3]) -> [T; 3] {
        self.matrix.transform_point(&Point3::from(p)).coords.into()
    }

    /// Return the transform that applies `self` followed by `other`.
    pub fn then(&self, other: &Transform<T>) -> Transform<T> {
        Transform {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Apply a linear map after this transform.
    fn post_multiply(&mut self, mtx: Matrix3<T>) {
        self.matrix = mtx.to_homogeneous() * self.matrix;
    }
}

impl<T: Real> Default for Transform<T> {
    fn default() -> Self {
        Transform::identity()
    }
}

impl<T: Real> Scale<T> for Transform<T> {
    /// Scale world space along each axis after this transform.
    fn scale(&mut self, [x, y, z]: [T; 3]) {
        self.post_multiply(Matrix3::from_diagonal(&Vector3::new(x, y, z)));
    }
}

impl<T: Real> Rotate<T> for Transform<T> {
    /// Rotate world space with the given column-major rotation matrix after this transform.
    fn rotate_by_matrix(&mut self, mtx: [[T; 3]; 3]) {
        self.post_multiply(Matrix3::from(mtx));
    }
}

impl<T: Real> Translate<T> for Transform<T> {
    /// Translate world space by `t` after this transform.
    fn translate(&mut self, t: [T; 3]) {
        self.matrix = Matrix4::new_translation(&Vector3::from(t)) * self.matrix;
    }
}

impl<T: Scalar + Zero + Neg<Output = T>> Skew for Vector3<T> {
    type Output = Matrix3<T>;

    /// A skew symmetric representation of the vector that represents the cross product operator.
    fn skew(&self) -> Self::Output {
        let [x, y, z]: [T; 3] = self.clone().into();
        Matrix3::from([
            [T::zero(), z.clone(), -y.clone()],
            [-z, T::zero(), x.clone()],
            [y, -x, T::zero()],
        ])
    }
}

pub trait Scale<T: Clone> {
    /// Scale the given object in 3D by a given vector of scale factors.
    /// `s = [1.0; 3]` corresponds to a noop.
    fn scale(&mut self, s: [T; 3]);
    /// Uniformly scale the given object by the given factor in all dimensions.
    fn uniform_scale(&mut self, s: T) {
        self.scale([s.clone(), s.clone(), s.clone()]);
    }
}

/// Rotate a given object by a certain amount. All functions rotate the object using the
/// right-hand-rule.
pub trait Rotate<T: RealField> {
    /// Rotate the object using the given column-major rotation matrix.
    fn rotate_by_matrix(&mut self, mtx: [[T; 3]; 3]);

    /// Rotate the object around the given unit vector `u` by the given angle `theta` (in radians).
    ///
    /// Note that it is assumed that `u` is indeed a unit vector, no further normalization should
    /// be performed.
    fn rotate(&mut self, axis: [T; 3], theta: T) {
        let u = Vector3::from(axis.clone());
        let [x, y, z] = axis;
        let id = Matrix3::identity();
        let u_skew = u.clone().skew();
        let cos_theta = theta.clone().cos();

        // R = cos(theta) * I + sin(theta)*[u]_X + (1 - cos(theta))(uu^T)
        let u_v_t = {
            let [a, b, c]: [T; 3] = (u * (T::one() - cos_theta.clone())).into();
            Matrix3::from([
                [x.clone() * a.clone(), x.clone() * b.clone(), x * c.clone()],
                [y.clone() * a.clone(), y.clone() * b.clone(), y * c.clone()],
                [z.clone() * a, z.clone() * b, z * c],
            ])
        };
        let mtx = id * cos_theta + u_skew * theta.sin() + u_v_t;
        self.rotate_by_matrix(mtx.into());
    }
}

pub trait Translate<T> {
    /// Translate the object by the given translation vector (displacement) `t`.
    fn translate(&mut self, t: [T; 3]);
}

/*
 * Functional variants of the above traits and their blanket implementations.
 */

pub trait Scaled<T>
where
    Self: Sized,
{
    /// Return a scaled version of `self`.
    fn scaled(self, s: [T; 3]) -> Self;
    /// Return a uniformly scaled version of `self`.
    fn uniformly_scaled(self, s: T) -> Self;
}

pub trait Rotated<T>
where
    Self: Sized,
{
    /// Return a version of `self` rotated about the unit vector `u` by the given angle `theta` (in
    /// radians).
    fn rotated(self, u: [T; 3], theta: T) -> Self;
}

pub trait Translated<T>
where
    Self: Sized,
{
    /// Return a version of `self` translated by the given translation vector `t`.
    fn translated(self, t: [T; 3]) -> Self;
}

impl<S, T: Copy> Scaled<T> for S
where
    S: Scale<T> + Sized,
{
    fn scaled(mut self, s: [T; 3]) -> Self {
        self.scale(s);
        self
    }
    fn uniformly_scaled(mut self, s: T) -> Self {
        self.uniform_scale(s);
        self
    }
}

impl<S, T: RealField> Rotated<T> for S
where
    S: Rotate<T> + Sized,
{
    fn rotated(mut self, u: [T; 3], theta: T) -> Self {
        self.rotate(u, theta);
        self
    }
}

impl<S, T> Translated<T> for S
where
    S: Translate<T> + Sized,
{
    fn translated(mut self, t: [T; 3]) -> Self {
        self.translate(t);
        self
    }
}
