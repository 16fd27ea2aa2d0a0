/*!
 * The user facing splits: by material, by plane side and by bone weight.
 */

use super::classify::{Bucket, Classifier, SplitRule};
use super::partition::{partition_with_progress, Parts};
use crate::error::{ElementKind, Error};
use crate::mesh::{BoneRef, Mesh, NumSubmeshes};
use crate::ops::transform::Transform;
use crate::progress::{NoProgress, Progress, DEFAULT_PROGRESS_INTERVAL};
use crate::Real;

/// The two outputs of a plane or bone split.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPair<T: Real> {
    /// Triangles with at least one vertex in front of the plane or owned by the bone.
    pub a: Mesh<T>,
    /// The remaining triangles.
    pub b: Mesh<T>,
}

impl<T: Real> SplitPair<T> {
    pub fn into_array(self) -> [Mesh<T>; 2] {
        [self.a, self.b]
    }

    fn from_parts(parts: Parts<T>) -> Result<Self, Error> {
        let num_parts = parts.len();
        let mut a = None;
        let mut b = None;
        for (bucket, mesh) in parts {
            match bucket {
                Bucket::A => a = Some(mesh),
                Bucket::B => b = Some(mesh),
                Bucket(i) => return Err(Error::out_of_range(ElementKind::Bucket, i, 2)),
            }
        }
        match (a, b) {
            (Some(a), Some(b)) => Ok(SplitPair { a, b }),
            _ => Err(Error::out_of_range(ElementKind::Bucket, 1, num_parts)),
        }
    }
}

/// Split a mesh with the given rule.
///
/// Returns `Ok(None)` if the rule has nothing to split. Material splits produce one single
/// submesh mesh per source submesh, bound to that submesh's material only.
pub fn split<T: Real>(mesh: &Mesh<T>, rule: &SplitRule<T>) -> Result<Option<Parts<T>>, Error> {
    split_with_progress(mesh, rule, DEFAULT_PROGRESS_INTERVAL, &mut NoProgress)
}

/// Same as `split` but reports progress every `interval` flat triangle indices.
pub fn split_with_progress<T: Real>(
    mesh: &Mesh<T>,
    rule: &SplitRule<T>,
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<Option<Parts<T>>, Error> {
    let classifier = match rule.bind(mesh)? {
        Some(classifier) => classifier,
        None => {
            log::debug!("Nothing to split");
            return Ok(None);
        }
    };
    let labels = classifier.labels(mesh.num_submeshes());
    let parts = partition_with_progress(mesh, &classifier, &labels, interval, progress)?;
    match classifier {
        Classifier::ByMaterial => parts
            .try_map(|Bucket(sidx), part| part.into_single_submesh(sidx))
            .map(Some),
        _ => Ok(Some(parts)),
    }
}

/// Turn every submesh into a standalone mesh with a single material.
///
/// A mesh without submeshes produces no outputs.
pub fn split_by_material<T: Real>(mesh: &Mesh<T>) -> Result<Vec<Mesh<T>>, Error> {
    split_by_material_with_progress(mesh, DEFAULT_PROGRESS_INTERVAL, &mut NoProgress)
}

pub fn split_by_material_with_progress<T: Real>(
    mesh: &Mesh<T>,
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<Vec<Mesh<T>>, Error> {
    Ok(
        split_with_progress(mesh, &SplitRule::ByMaterial, interval, progress)?
            .map_or_else(Vec::new, Parts::into_vec),
    )
}

/// Split a mesh along the plane spanned by the first triangle of `reference`.
///
/// `to_world` and `reference_to_world` are the object-to-world transforms of the two meshes.
/// Triangles with at least one vertex strictly in front of the plane go to `a`.
///
/// The reference triangle must span a plane. A reference without triangles fails with
/// `MissingReferenceTriangle`, and a collinear one fails with `DegeneratePlane` rather than
/// producing a zero-normal plane that would send every triangle to `b`.
pub fn split_by_plane<T: Real>(
    mesh: &Mesh<T>,
    to_world: &Transform<T>,
    reference: &Mesh<T>,
    reference_to_world: &Transform<T>,
) -> Result<SplitPair<T>, Error> {
    split_by_plane_with_progress(
        mesh,
        to_world,
        reference,
        reference_to_world,
        DEFAULT_PROGRESS_INTERVAL,
        &mut NoProgress,
    )
}

pub fn split_by_plane_with_progress<T: Real>(
    mesh: &Mesh<T>,
    to_world: &Transform<T>,
    reference: &Mesh<T>,
    reference_to_world: &Transform<T>,
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<SplitPair<T>, Error> {
    let rule = SplitRule::by_plane(reference, reference_to_world, *to_world)?;
    match split_with_progress(mesh, &rule, interval, progress)? {
        Some(parts) => SplitPair::from_parts(parts),
        None => Err(Error::out_of_range(ElementKind::Bucket, 0, 0)),
    }
}

/// Split a skinned mesh by the vertices the given bone owns.
///
/// Returns `Ok(None)` for unskinned meshes and meshes without submeshes. Fails with
/// `UnsupportedSkinLayout` for unlimited skin layouts and with `BoneNotFound` if the bone is not
/// part of the mesh.
pub fn split_by_bone<T: Real>(
    mesh: &Mesh<T>,
    bone: &BoneRef,
) -> Result<Option<SplitPair<T>>, Error> {
    split_by_bone_with_progress(mesh, bone, DEFAULT_PROGRESS_INTERVAL, &mut NoProgress)
}

pub fn split_by_bone_with_progress<T: Real>(
    mesh: &Mesh<T>,
    bone: &BoneRef,
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<Option<SplitPair<T>>, Error> {
    split_with_progress(mesh, &SplitRule::ByBone(bone.clone()), interval, progress)?
        .map(SplitPair::from_parts)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::builder::*;
    use crate::mesh::{
        BoneWeight, BoneWeightLayout, Material, NumTriangles, NumVertices, Skin, VertexPositions,
    };
    use crate::ops::transform::*;
    use crate::progress::tests::RecordingProgress;

    fn yz_reference() -> Mesh<f64> {
        let verts = vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        Mesh::from_flat_indices(verts, &[vec![0, 1, 2]]).unwrap()
    }

    fn identity() -> Transform<f64> {
        Transform::identity()
    }

    #[test]
    fn yz_plane_scenario() {
        let verts = vec![
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ];
        let mesh = Mesh::from_flat_indices(verts, &[vec![0, 1, 2, 1, 2, 3]]).unwrap();
        let SplitPair { a, b } =
            split_by_plane(&mesh, &identity(), &yz_reference(), &identity()).unwrap();

        assert_eq!(a.num_submeshes(), 1);
        assert_eq!(a.triangle_indices(0).unwrap(), &[0, 1, 2, 1, 2, 3]);
        assert_eq!(b.num_submeshes(), 1);
        assert!(b.triangle_indices(0).unwrap().is_empty());
    }

    #[test]
    fn material_split_identity() {
        let grid: Mesh<f64> = GridBuilder {
            rows: 2,
            cols: 3,
            orientation: AxisPlaneOrientation::XY,
            submeshes: 3,
        }
        .build();
        let materials: Vec<Material> = vec!["wood".into(), "metal".into(), "glass".into()];
        let mesh = grid.with_materials(materials.clone()).unwrap();

        let outputs = split_by_material(&mesh).unwrap();
        assert_eq!(outputs.len(), 3);
        for (j, out) in outputs.iter().enumerate() {
            assert_eq!(out.num_submeshes(), 1);
            assert_eq!(
                out.triangle_indices(0).unwrap(),
                mesh.triangle_indices(j).unwrap()
            );
            assert_eq!(out.materials(), &materials[j..j + 1]);
            assert_eq!(out.vertex_positions(), mesh.vertex_positions());
        }
    }

    #[test]
    fn material_split_without_materials_or_submeshes() {
        let mesh = Mesh::<f32>::from_flat_indices(
            vec![[0.0; 3]; 3],
            &[vec![0, 1, 2], vec![], vec![2, 1, 0]],
        )
        .unwrap();
        let outputs = split_by_material(&mesh).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[1].triangle_indices(0).unwrap().is_empty());
        assert!(outputs.iter().all(|m| m.materials().is_empty()));

        let empty = Mesh::<f32>::default();
        assert!(split_by_material(&empty).unwrap().is_empty());
    }

    #[test]
    fn plane_split_totality() {
        let grid: Mesh<f64> = GridBuilder {
            rows: 5,
            cols: 5,
            orientation: AxisPlaneOrientation::XY,
            submeshes: 2,
        }
        .build();
        // Cut along x = 0.1 so that some triangles straddle the plane.
        let reference_to_world = identity().translated([0.1, 0.0, 0.0]);
        let pair =
            split_by_plane(&grid, &identity(), &yz_reference(), &reference_to_world).unwrap();

        for sidx in 0..grid.num_submeshes() {
            let src = grid.triangles(sidx).unwrap();
            let a = pair.a.triangles(sidx).unwrap();
            let b = pair.b.triangles(sidx).unwrap();
            assert_eq!(a.len() + b.len(), src.len());
            for tri in a {
                assert!(!b.contains(tri));
                assert!(tri.iter().any(|&v| grid.vertex_position(v).unwrap()[0] > 0.1));
            }
            for tri in b {
                assert!(tri.iter().all(|&v| grid.vertex_position(v).unwrap()[0] <= 0.1));
            }
        }
        assert!(pair.a.num_triangles() > 0);
        assert!(pair.b.num_triangles() > 0);
    }

    #[test]
    fn inclusive_tie_break() {
        let verts = vec![
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [-1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let mesh = Mesh::from_flat_indices(verts, &[vec![0, 1, 2, 3, 1, 2]]).unwrap();
        let [a, b] = split_by_plane(&mesh, &identity(), &yz_reference(), &identity())
            .unwrap()
            .into_array();
        // One front vertex is enough, a vertex on the plane is not.
        assert_eq!(a.triangles(0).unwrap(), &[[0, 1, 2]]);
        assert_eq!(b.triangles(0).unwrap(), &[[3, 1, 2]]);
    }

    #[test]
    fn plane_split_in_world_space() {
        let quad: Mesh<f64> = QuadBuilder::new(AxisPlaneOrientation::XY).build();
        // Rotating the reference quad about y makes it face -x in world space.
        let quad_to_world = identity().rotated([0.0, 1.0, 0.0], std::f64::consts::FRAC_PI_2);
        let verts = vec![[0.5, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, 0.0, 1.0]];
        let mesh = Mesh::from_flat_indices(verts, &[vec![0, 1, 2]]).unwrap();

        let pair = split_by_plane(&mesh, &identity(), &quad, &quad_to_world).unwrap();
        assert_eq!(pair.b.num_triangles(), 1);

        // Moving the mesh to the other side of the plane flips the outcome.
        let to_world = identity().translated([-1.0, 0.0, 0.0]);
        let pair = split_by_plane(&mesh, &to_world, &quad, &quad_to_world).unwrap();
        assert_eq!(pair.a.num_triangles(), 1);
        assert_eq!(pair.a.vertex_positions(), mesh.vertex_positions());
    }

    fn skinned_pair(layout: BoneWeightLayout) -> Mesh<f64> {
        let verts = vec![[0.0; 3]; 5];
        let skin = Skin::new(
            layout,
            vec![
                BoneWeight::new(0, 1.0),
                BoneWeight::new(0, 1.0),
                BoneWeight::new(0, 1.0),
                BoneWeight::new(1, 0.6),
                BoneWeight::new(1, 0.0),
            ],
            vec!["root".into(), "hand".into()],
        );
        Mesh::from_flat_indices(verts, &[vec![0, 1, 2, 0, 1, 3], vec![4, 0, 1]])
            .unwrap()
            .with_skin(skin)
            .unwrap()
    }

    #[test]
    fn bone_split() {
        let mesh = skinned_pair(BoneWeightLayout::Limited);
        let mut progress = RecordingProgress::default();
        let pair = split_by_bone_with_progress(&mesh, &"hand".into(), 30, &mut progress)
            .unwrap()
            .unwrap();
        assert_eq!(pair.a.triangles(0).unwrap(), &[[0, 1, 3]]);
        assert!(pair.a.triangles(1).unwrap().is_empty());
        assert_eq!(pair.b.triangles(0).unwrap(), &[[0, 1, 2]]);
        // Zero weight does not count as ownership.
        assert_eq!(pair.b.triangles(1).unwrap(), &[[4, 0, 1]]);
        assert_eq!(pair.a.skin(), mesh.skin());
        assert_eq!(progress.clears, 1);
    }

    #[test]
    fn bone_split_no_op() {
        let unskinned = skinned_pair(BoneWeightLayout::None);
        assert_eq!(split_by_bone(&unskinned, &"hand".into()), Ok(None));

        let plain = Mesh::<f64>::from_flat_indices(vec![[0.0; 3]; 3], &[vec![0, 1, 2]]).unwrap();
        assert_eq!(split_by_bone(&plain, &"hand".into()), Ok(None));

        let skin = Skin::new(
            BoneWeightLayout::Limited,
            vec![BoneWeight::new(0, 1.0); 3],
            vec!["hand".into()],
        );
        let no_submeshes = Mesh::<f64>::new(vec![[0.0; 3]; 3], Vec::new())
            .unwrap()
            .with_skin(skin)
            .unwrap();
        let mut progress = RecordingProgress::default();
        assert_eq!(
            split_by_bone_with_progress(&no_submeshes, &"hand".into(), 30, &mut progress),
            Ok(None)
        );
        assert!(progress.reports.is_empty());
    }

    #[test]
    fn bone_split_failures() {
        let unlimited = skinned_pair(BoneWeightLayout::Unlimited);
        assert_eq!(
            split_by_bone(&unlimited, &"hand".into()),
            Err(Error::UnsupportedSkinLayout)
        );
        // The layout is checked before the bone.
        assert_eq!(
            split_by_bone(&unlimited, &"foot".into()),
            Err(Error::UnsupportedSkinLayout)
        );

        let mut progress = RecordingProgress::default();
        let limited = skinned_pair(BoneWeightLayout::Limited);
        assert_eq!(
            split_by_bone_with_progress(&limited, &"foot".into(), 30, &mut progress),
            Err(Error::BoneNotFound("foot".to_string()))
        );
        assert!(progress.reports.is_empty());
    }

    #[test]
    fn generic_split_labels() {
        let mesh = skinned_pair(BoneWeightLayout::Limited);
        let parts = split(&mesh, &SplitRule::ByBone("root".into()))
            .unwrap()
            .unwrap();
        assert_eq!(parts.labels(), &[Bucket::A, Bucket::B]);
        assert_eq!(parts.get(Bucket::A).unwrap().num_triangles(), 3);
        assert_eq!(parts.get(Bucket::B).unwrap().num_vertices(), 5);

        let parts = split(&mesh, &SplitRule::ByMaterial).unwrap().unwrap();
        assert_eq!(parts.labels(), &[Bucket(0), Bucket(1)]);
        assert!(parts.iter().all(|(_, m)| m.num_submeshes() == 1));
    }
}
