use crate::error::{ElementKind, Error};
use crate::mesh::material::Material;
use crate::mesh::skin::{BoneRef, BoneWeight, BoneWeightLayout, Skin};
use crate::mesh::submesh::Submesh;
use crate::mesh::topology::*;
use crate::mesh::vertex_positions::VertexPositions;
use crate::Real;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh whose triangles are grouped into submeshes sharing a single vertex pool.
///
/// Each submesh may be bound to one material, and the vertices may carry skinning data. All
/// triangle indices are guaranteed to be valid indices into the vertex pool.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh<T: Real> {
    /// Vertex positions in object space.
    vertex_positions: Vec<[T; 3]>,
    submeshes: Vec<Submesh>,
    /// Either empty or one material per submesh.
    materials: Vec<Material>,
    skin: Option<Skin>,
}

impl<T: Real> Mesh<T> {
    /// Build a mesh from a vertex pool and a list of submeshes.
    ///
    /// Fails with `IndexOutOfRange` if any triangle refers to a vertex outside the pool.
    pub fn new(verts: Vec<[T; 3]>, submeshes: Vec<Submesh>) -> Result<Mesh<T>, Error> {
        validate_triangles(verts.len(), &submeshes)?;
        Ok(Mesh {
            vertex_positions: verts,
            submeshes,
            materials: Vec::new(),
            skin: None,
        })
    }

    /// Build a mesh from triangles known to be valid.
    pub(crate) fn from_parts_unchecked(verts: Vec<[T; 3]>, submeshes: Vec<Submesh>) -> Mesh<T> {
        debug_assert!(validate_triangles(verts.len(), &submeshes).is_ok());
        Mesh {
            vertex_positions: verts,
            submeshes,
            materials: Vec::new(),
            skin: None,
        }
    }

    /// Build a mesh from flat index lists, one per submesh.
    pub fn from_flat_indices<I: AsRef<[usize]>>(
        verts: Vec<[T; 3]>,
        submesh_indices: &[I],
    ) -> Result<Mesh<T>, Error> {
        let submeshes = submesh_indices
            .iter()
            .enumerate()
            .map(|(i, indices)| Submesh::from_flat_indices(indices.as_ref(), i))
            .collect::<Result<Vec<_>, _>>()?;
        Mesh::new(verts, submeshes)
    }

    /// Bind one material per submesh. An empty list removes all material bindings.
    pub fn with_materials(mut self, materials: Vec<Material>) -> Result<Mesh<T>, Error> {
        if !materials.is_empty() && materials.len() != self.submeshes.len() {
            return Err(Error::SizeMismatch {
                kind: ElementKind::Material,
                expected: self.submeshes.len(),
                given: materials.len(),
            });
        }
        self.materials = materials;
        Ok(self)
    }

    /// Bind skinning data to the vertices of this mesh.
    pub fn with_skin(mut self, skin: Skin) -> Result<Mesh<T>, Error> {
        skin.validate(self.vertex_positions.len())?;
        self.skin = Some(skin);
        Ok(self)
    }

    /// Submesh accessor.
    #[inline]
    pub fn submesh<SI: Into<SubmeshIndex>>(&self, sidx: SI) -> Result<&Submesh, Error> {
        let sidx = usize::from(sidx.into());
        self.submeshes
            .get(sidx)
            .ok_or_else(|| Error::out_of_range(ElementKind::Submesh, sidx, self.submeshes.len()))
    }

    /// Return a slice of all submeshes.
    #[inline]
    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Flat triangle index list of the given submesh. The length is a multiple of 3.
    #[inline]
    pub fn triangle_indices<SI: Into<SubmeshIndex>>(&self, sidx: SI) -> Result<&[usize], Error> {
        self.submesh(sidx).map(Submesh::indices)
    }

    /// Triangles of the given submesh.
    #[inline]
    pub fn triangles<SI: Into<SubmeshIndex>>(&self, sidx: SI) -> Result<&[[usize; 3]], Error> {
        self.submesh(sidx).map(Submesh::triangles)
    }

    /// The first triangle of the mesh, taking submeshes in order.
    pub fn first_triangle(&self) -> Option<[usize; 3]> {
        self.submeshes
            .iter()
            .find_map(|submesh| submesh.triangles().first().copied())
    }

    /// Vertex accessor.
    #[inline]
    pub fn vertex_position<VI: Into<VertexIndex>>(&self, vidx: VI) -> Result<[T; 3], Error> {
        let vidx = usize::from(vidx.into());
        self.vertex_positions.get(vidx).copied().ok_or_else(|| {
            Error::out_of_range(ElementKind::Vertex, vidx, self.vertex_positions.len())
        })
    }

    /// Materials bound to the submeshes. Either empty or one per submesh.
    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material bound to the given submesh, if materials are bound at all.
    pub fn material<SI: Into<SubmeshIndex>>(&self, sidx: SI) -> Result<Option<&Material>, Error> {
        let sidx = usize::from(sidx.into());
        if sidx >= self.submeshes.len() {
            return Err(Error::out_of_range(
                ElementKind::Submesh,
                sidx,
                self.submeshes.len(),
            ));
        }
        Ok(self.materials.get(sidx))
    }

    #[inline]
    pub fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }

    /// Skin layout of this mesh. Meshes without a skin report `BoneWeightLayout::None`.
    #[inline]
    pub fn bone_weight_layout(&self) -> BoneWeightLayout {
        self.skin.as_ref().map_or(BoneWeightLayout::None, Skin::layout)
    }

    /// Primary bone and weight of the given vertex.
    pub fn primary_bone<VI: Into<VertexIndex>>(&self, vidx: VI) -> Result<BoneWeight, Error> {
        let vidx = usize::from(vidx.into());
        let weights = self.skin.as_ref().map_or(&[][..], Skin::primary_weights);
        weights
            .get(vidx)
            .copied()
            .ok_or_else(|| Error::out_of_range(ElementKind::BoneWeight, vidx, weights.len()))
    }

    /// Bones the skin refers to, empty for unskinned meshes.
    #[inline]
    pub fn bones(&self) -> &[BoneRef] {
        self.skin.as_ref().map_or(&[][..], Skin::bones)
    }

    /// Build a mesh sharing everything but the triangles with `self`.
    ///
    /// The vertex pool and the bindings are deep copied, so the new mesh is independent of
    /// `self`. The caller guarantees that `submeshes` only refers to vertices of `self`.
    pub(crate) fn with_submeshes(&self, submeshes: Vec<Submesh>) -> Mesh<T> {
        debug_assert!(validate_triangles(self.vertex_positions.len(), &submeshes).is_ok());
        Mesh {
            vertex_positions: self.vertex_positions.clone(),
            submeshes,
            materials: self.materials.clone(),
            skin: self.skin.clone(),
        }
    }

    /// Strip this mesh down to the single submesh at `sidx` along with its material.
    pub(crate) fn into_single_submesh(mut self, sidx: usize) -> Result<Mesh<T>, Error> {
        let num_submeshes = self.submeshes.len();
        if sidx >= num_submeshes {
            return Err(Error::out_of_range(ElementKind::Submesh, sidx, num_submeshes));
        }
        let submesh = self.submeshes.swap_remove(sidx);
        self.submeshes = vec![submesh];
        if !self.materials.is_empty() {
            let material = self.materials.swap_remove(sidx);
            self.materials = vec![material];
        }
        Ok(self)
    }
}

fn validate_triangles(num_vertices: usize, submeshes: &[Submesh]) -> Result<(), Error> {
    for submesh in submeshes {
        if let Some(max) = submesh.max_index() {
            if max >= num_vertices {
                return Err(Error::out_of_range(ElementKind::Vertex, max, num_vertices));
            }
        }
    }
    Ok(())
}

impl<T: Real> NumVertices for Mesh<T> {
    fn num_vertices(&self) -> usize {
        self.vertex_positions.len()
    }
}

impl<T: Real> NumSubmeshes for Mesh<T> {
    fn num_submeshes(&self) -> usize {
        self.submeshes.len()
    }
}

impl<T: Real> NumTriangles for Mesh<T> {
    fn num_triangles(&self) -> usize {
        self.submeshes.iter().map(Submesh::num_triangles).sum()
    }
}

impl<T: Real> VertexPositions for Mesh<T> {
    type Element = [T; 3];

    #[inline]
    fn vertex_positions(&self) -> &[Self::Element] {
        &self.vertex_positions
    }

    #[inline]
    fn vertex_positions_mut(&mut self) -> &mut [Self::Element] {
        &mut self.vertex_positions
    }
}

impl<T: Real> Default for Mesh<T> {
    /// Produce an empty mesh with no vertices and no submeshes.
    fn default() -> Self {
        Mesh {
            vertex_positions: Vec::new(),
            submeshes: Vec::new(),
            materials: Vec::new(),
            skin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_material_mesh() -> Mesh<f64> {
        let verts = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        Mesh::from_flat_indices(verts, &[vec![0, 1, 2], vec![0, 2, 3]])
            .unwrap()
            .with_materials(vec!["skin".into(), "cloth".into()])
            .unwrap()
    }

    #[test]
    fn accessors() {
        let mesh = two_material_mesh();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_submeshes(), 2);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.triangle_indices(1).unwrap(), &[0, 2, 3]);
        assert_eq!(mesh.triangles(0).unwrap(), &[[0, 1, 2]]);
        assert_eq!(mesh.vertex_position(2).unwrap(), [1.0, 1.0, 0.0]);
        assert_eq!(mesh.material(1).unwrap(), Some(&Material::new("cloth")));
        assert_eq!(mesh.first_triangle(), Some([0, 1, 2]));
        assert_eq!(mesh.bone_weight_layout(), BoneWeightLayout::None);
        assert!(mesh.bones().is_empty());
    }

    #[test]
    fn out_of_range_access() {
        let mesh = two_material_mesh();
        assert_eq!(
            mesh.triangle_indices(2),
            Err(Error::IndexOutOfRange {
                kind: ElementKind::Submesh,
                index: 2,
                len: 2
            })
        );
        assert_eq!(
            mesh.vertex_position(4),
            Err(Error::IndexOutOfRange {
                kind: ElementKind::Vertex,
                index: 4,
                len: 4
            })
        );
        assert!(mesh.material(5).is_err());
        assert_eq!(
            mesh.primary_bone(0),
            Err(Error::IndexOutOfRange {
                kind: ElementKind::BoneWeight,
                index: 0,
                len: 0
            })
        );
    }

    #[test]
    fn invalid_construction() {
        let verts = vec![[0.0f32; 3]; 3];
        assert_eq!(
            Mesh::new(verts.clone(), vec![Submesh::new(vec![[0, 1, 3]])]),
            Err(Error::IndexOutOfRange {
                kind: ElementKind::Vertex,
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            Mesh::from_flat_indices(verts.clone(), &[vec![0, 1, 2], vec![0, 1]]),
            Err(Error::MalformedTriangleList { submesh: 1, len: 2 })
        );
        let mesh = Mesh::from_flat_indices(verts, &[vec![0, 1, 2]]).unwrap();
        assert_eq!(
            mesh.with_materials(vec!["a".into(), "b".into()]),
            Err(Error::SizeMismatch {
                kind: ElementKind::Material,
                expected: 1,
                given: 2
            })
        );
    }

    #[test]
    fn skinned_accessors() {
        let skin = Skin::new(
            BoneWeightLayout::Limited,
            vec![
                BoneWeight::new(0, 1.0),
                BoneWeight::new(1, 0.75),
                BoneWeight::new(1, 0.0),
                BoneWeight::new(0, 0.5),
            ],
            vec!["hip".into(), "knee".into()],
        );
        let mesh = two_material_mesh().with_skin(skin).unwrap();
        assert_eq!(mesh.bone_weight_layout(), BoneWeightLayout::Limited);
        assert_eq!(mesh.primary_bone(1).unwrap(), BoneWeight::new(1, 0.75));
        assert_eq!(mesh.bones(), &[BoneRef::new("hip"), BoneRef::new("knee")]);
    }

    #[test]
    fn single_submesh() {
        let mesh = two_material_mesh().into_single_submesh(1).unwrap();
        assert_eq!(mesh.num_submeshes(), 1);
        assert_eq!(mesh.triangle_indices(0).unwrap(), &[0, 2, 3]);
        assert_eq!(mesh.materials(), &[Material::new("cloth")]);
        assert_eq!(mesh.num_vertices(), 4);
    }
}
