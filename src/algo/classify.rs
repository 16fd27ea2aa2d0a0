/*!
 * Per-triangle classification rules.
 *
 * A `SplitRule` is what the caller asks for. Binding it to a mesh resolves all per-operation
 * state once (the target bone index, the vertex pool, the cut plane) and yields a `Classifier`
 * whose `classify` is a pure function of a triangle and the submesh it belongs to.
 */

use crate::error::{ElementKind, Error};
use crate::mesh::topology::BoneIndex;
use crate::mesh::{
    BoneRef, BoneWeight, BoneWeightLayout, Mesh, NumSubmeshes, NumVertices, VertexPositions,
};
use crate::ops::transform::Transform;
use crate::prim::{Plane, Triangle};
use crate::Real;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label of one output of a split.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bucket(pub usize);

impl Bucket {
    /// Triangles touching the front of the cut plane or the target bone.
    pub const A: Bucket = Bucket(0);
    /// Everything else.
    pub const B: Bucket = Bucket(1);
}

impl From<usize> for Bucket {
    fn from(i: usize) -> Bucket {
        Bucket(i)
    }
}

/// The rule used to assign triangles to buckets.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitRule<T: Real> {
    /// One bucket per submesh.
    ByMaterial,
    /// Two buckets separated by a world space plane.
    ByPlane {
        plane: Plane<T>,
        /// Object-to-world transform of the mesh being split.
        to_world: Transform<T>,
    },
    /// Two buckets separated by primary bone ownership.
    ByBone(BoneRef),
}

impl<T: Real> SplitRule<T> {
    /// Build a plane rule from the first triangle of a reference mesh.
    ///
    /// The reference triangle is moved to world space with `reference_to_world`, while triangles of
    /// the mesh being split are moved to world space with `to_world`.
    pub fn by_plane(
        reference: &Mesh<T>,
        reference_to_world: &Transform<T>,
        to_world: Transform<T>,
    ) -> Result<Self, Error> {
        Ok(SplitRule::ByPlane {
            plane: cut_plane(reference, reference_to_world)?,
            to_world,
        })
    }

    /// Resolve this rule against the given mesh.
    ///
    /// Returns `Ok(None)` when there is nothing to split, which only happens for bone rules on
    /// meshes without skinning or without submeshes.
    pub fn bind<'a>(&self, mesh: &'a Mesh<T>) -> Result<Option<Classifier<'a, T>>, Error> {
        match self {
            SplitRule::ByMaterial => Ok(Some(Classifier::ByMaterial)),
            SplitRule::ByPlane { plane, to_world } => {
                Ok(Some(Classifier::by_plane(*plane, *to_world, mesh)))
            }
            SplitRule::ByBone(bone) => Classifier::by_bone(mesh, bone),
        }
    }
}

/// Build the world space cut plane from the first triangle of `reference`.
///
/// Triangles are searched in submesh order. Fails with `MissingReferenceTriangle` if the mesh has
/// no triangles and with `DegeneratePlane` if the first triangle is degenerate in world space.
pub fn cut_plane<T: Real>(
    reference: &Mesh<T>,
    reference_to_world: &Transform<T>,
) -> Result<Plane<T>, Error> {
    let tri = reference
        .first_triangle()
        .ok_or(Error::MissingReferenceTriangle)?;
    let positions = [
        reference.vertex_position(tri[0])?,
        reference.vertex_position(tri[1])?,
        reference.vertex_position(tri[2])?,
    ];
    let world = Triangle::new(positions).transformed(reference_to_world);
    Plane::from_triangle(&world).ok_or(Error::DegeneratePlane)
}

/// True if `pred` holds for the data of any vertex of `tri`.
fn any_vertex<V>(
    tri: [usize; 3],
    data: &[V],
    mut pred: impl FnMut(&V) -> bool,
) -> Result<bool, Error> {
    for vtx in tri {
        let value = data
            .get(vtx)
            .ok_or_else(|| Error::out_of_range(ElementKind::Vertex, vtx, data.len()))?;
        if pred(value) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// A split rule bound to a specific mesh.
#[derive(Copy, Clone, Debug)]
pub enum Classifier<'a, T: Real> {
    ByMaterial,
    ByPlane {
        plane: Plane<T>,
        to_world: Transform<T>,
        positions: &'a [[T; 3]],
    },
    ByBone {
        bone: BoneIndex,
        weights: &'a [BoneWeight],
    },
}

impl<'a, T: Real> Classifier<'a, T> {
    pub fn by_plane(plane: Plane<T>, to_world: Transform<T>, mesh: &'a Mesh<T>) -> Self {
        Classifier::ByPlane {
            plane,
            to_world,
            positions: mesh.vertex_positions(),
        }
    }

    /// Resolve the target bone of a bone split.
    ///
    /// Unlimited skin layouts are rejected before anything else is checked. Meshes without
    /// skinning or without submeshes yield `Ok(None)`.
    pub fn by_bone(mesh: &'a Mesh<T>, bone: &BoneRef) -> Result<Option<Self>, Error> {
        match mesh.bone_weight_layout() {
            BoneWeightLayout::Unlimited => return Err(Error::UnsupportedSkinLayout),
            BoneWeightLayout::None => return Ok(None),
            BoneWeightLayout::Limited => {}
        }
        let skin = match mesh.skin() {
            Some(skin) => skin,
            None => return Ok(None),
        };
        if mesh.num_submeshes() == 0 {
            return Ok(None);
        }
        let bone = skin.find_bone(bone)?;
        Ok(Some(Classifier::ByBone {
            bone,
            weights: skin.primary_weights(),
        }))
    }

    /// Assign a triangle of the given submesh to a bucket.
    ///
    /// Plane and bone classifiers put a triangle in `Bucket::A` as soon as one of its vertices
    /// qualifies. Triangles are never clipped. A vertex outside the pool the classifier was bound
    /// to fails with `IndexOutOfRange`.
    pub fn classify(&self, tri: [usize; 3], submesh: usize) -> Result<Bucket, Error> {
        let qualifies = match self {
            Classifier::ByMaterial => return Ok(Bucket(submesh)),
            Classifier::ByPlane {
                plane,
                to_world,
                positions,
            } => any_vertex(tri, *positions, |&p| {
                plane.is_front(to_world.transform_point(p))
            })?,
            Classifier::ByBone { bone, weights } => {
                any_vertex(tri, *weights, |w| w.bone == *bone && w.weight != 0.0)?
            }
        };
        Ok(if qualifies { Bucket::A } else { Bucket::B })
    }

    /// Check that this classifier was bound to a vertex pool the size of the pool of `mesh`.
    pub fn check_vertex_pool(&self, mesh: &Mesh<T>) -> Result<(), Error> {
        let given = match self {
            Classifier::ByMaterial => return Ok(()),
            Classifier::ByPlane { positions, .. } => positions.len(),
            Classifier::ByBone { weights, .. } => weights.len(),
        };
        let expected = mesh.num_vertices();
        if given != expected {
            return Err(Error::SizeMismatch {
                kind: ElementKind::Vertex,
                expected,
                given,
            });
        }
        Ok(())
    }

    /// All buckets this classifier can produce for a mesh with `num_submeshes` submeshes.
    pub fn labels(&self, num_submeshes: usize) -> Vec<Bucket> {
        match self {
            Classifier::ByMaterial => (0..num_submeshes).map(Bucket).collect(),
            Classifier::ByPlane { .. } | Classifier::ByBone { .. } => vec![Bucket::A, Bucket::B],
        }
    }
}
