/**
 * This module provides convenience functions for building common meshes.
 */
use super::{Mesh, Submesh};
use crate::Real;
use math::convert;

/// A trait for building meshes representing various objects.
///
/// ```
/// use meshsplit::{builder::MeshBuilder, builder::QuadBuilder, Mesh};
/// let quad: Mesh<f64> = QuadBuilder::default().build();
/// ```
pub trait MeshBuilder<M> {
    /// Builds a mesh of the given type `M`.
    fn build(self) -> M;
}

/// Axis plane orientation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AxisPlaneOrientation {
    XY,
    YZ,
    ZX,
}

impl AxisPlaneOrientation {
    /// Place the in-plane coordinates `(r, c)` in 3D space.
    fn place<T: Real>(self, r: T, c: T) -> [T; 3] {
        match self {
            AxisPlaneOrientation::XY => [r, c, T::zero()],
            AxisPlaneOrientation::YZ => [T::zero(), r, c],
            AxisPlaneOrientation::ZX => [c, T::zero(), r],
        }
    }
}

/// Parameters that define a triangulated grid that lies in one of the 3 axis planes in 3D space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridBuilder {
    /// Number of grid cells in each column.
    pub rows: usize,
    /// Number of grid cells in each row.
    pub cols: usize,
    /// Axis orientation of the grid.
    pub orientation: AxisPlaneOrientation,
    /// Number of submeshes. Cells in column `j` go to submesh `j % submeshes`.
    pub submeshes: usize,
}

impl GridBuilder {
    /// Generate a [-1,1]x[-1,1] grid with the given cell resolution and grid orientation. The
    /// grid nodes are specified in row major order and every cell is split into two triangles.
    pub fn build<T: Real>(self) -> Mesh<T> {
        let GridBuilder {
            rows,
            cols,
            orientation,
            submeshes,
        } = self;

        let mut positions = Vec::new();

        // iterate over vertices
        for j in 0..=cols {
            for i in 0..=rows {
                let r = convert::<f64, T>(-1.0 + 2.0 * (i as f64) / rows as f64);
                let c = convert::<f64, T>(-1.0 + 2.0 * (j as f64) / cols as f64);
                positions.push(orientation.place(r, c));
            }
        }

        let mut triangles = vec![Vec::new(); submeshes.max(1)];
        let num_bins = triangles.len();

        // iterate over cells
        for i in 0..rows {
            for j in 0..cols {
                let quad = [
                    (rows + 1) * j + i,
                    (rows + 1) * j + i + 1,
                    (rows + 1) * (j + 1) + i + 1,
                    (rows + 1) * (j + 1) + i,
                ];
                let bin = &mut triangles[j % num_bins];
                bin.push([quad[0], quad[1], quad[2]]);
                bin.push([quad[0], quad[2], quad[3]]);
            }
        }

        Mesh::from_parts_unchecked(positions, triangles.into_iter().map(Submesh::new).collect())
    }
}

impl<T: Real> MeshBuilder<Mesh<T>> for GridBuilder {
    fn build(self) -> Mesh<T> {
        self.build::<T>()
    }
}

/// Builder for a unit quad centered at the origin, made of two triangles.
///
/// The first triangle is wound so that the plane it spans faces the negative normal axis of the
/// chosen orientation (e.g. `-z` for `XY`), which makes the quad a convenient cut plane
/// reference.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadBuilder {
    pub orientation: AxisPlaneOrientation,
}

impl Default for QuadBuilder {
    fn default() -> Self {
        QuadBuilder {
            orientation: AxisPlaneOrientation::XY,
        }
    }
}

impl QuadBuilder {
    pub fn new(orientation: AxisPlaneOrientation) -> Self {
        QuadBuilder { orientation }
    }

    pub fn build<T: Real>(self) -> Mesh<T> {
        let h = convert::<f64, T>(0.5);
        let positions = vec![
            self.orientation.place(-h, -h),
            self.orientation.place(h, -h),
            self.orientation.place(-h, h),
            self.orientation.place(h, h),
        ];
        let triangles = vec![[0, 3, 1], [3, 0, 2]];
        Mesh::from_parts_unchecked(positions, vec![Submesh::new(triangles)])
    }
}

impl<T: Real> MeshBuilder<Mesh<T>> for QuadBuilder {
    fn build(self) -> Mesh<T> {
        self.build::<T>()
    }
}
