pub mod transform;

pub use transform::*;

pub trait Normal<T> {
    /// Compute the unit normal of this object.
    fn normal(self) -> T;
}

pub trait Skew {
    type Output;
    /// Produce a skew form of self. For instance a 3D vector can be rearranged in a skew symmetric
    /// matrix, that corresponds to the cross product operator.
    fn skew(&self) -> Self::Output;
}
