/*!
 * This module regroups the triangles of a mesh into buckets.
 *
 * The partition walks submeshes in ascending order and triangles in storage order, so the
 * relative order of triangles within each output submesh matches the source. Every output keeps
 * the submesh count of the source; buckets that receive no triangles for some submesh get an
 * empty submesh there.
 */

use super::classify::{Bucket, Classifier};
use crate::error::{ElementKind, Error};
use crate::mesh::{Mesh, NumSubmeshes, NumTriangles, Submesh};
use crate::progress::{checkpoint_label, NoProgress, Progress, DEFAULT_PROGRESS_INTERVAL};
use crate::Real;
use ahash::AHashMap as HashMap;

/// Output meshes of a partition, one per bucket in label order.
#[derive(Clone, Debug, PartialEq)]
pub struct Parts<T: Real> {
    labels: Vec<Bucket>,
    meshes: Vec<Mesh<T>>,
}

impl<T: Real> Parts<T> {
    /// Mesh assigned to the given bucket.
    pub fn get(&self, bucket: Bucket) -> Option<&Mesh<T>> {
        self.labels
            .iter()
            .position(|&label| label == bucket)
            .map(|i| &self.meshes[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[Bucket] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &Mesh<T>)> {
        self.labels.iter().copied().zip(self.meshes.iter())
    }

    /// Drop the labels and return the meshes in label order.
    pub fn into_vec(self) -> Vec<Mesh<T>> {
        self.meshes
    }

    /// Transform each mesh, stopping at the first failure.
    pub(crate) fn try_map<F>(self, mut f: F) -> Result<Parts<T>, Error>
    where
        F: FnMut(Bucket, Mesh<T>) -> Result<Mesh<T>, Error>,
    {
        let Parts { labels, meshes } = self;
        let meshes = labels
            .iter()
            .copied()
            .zip(meshes)
            .map(|(label, mesh)| f(label, mesh))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Parts { labels, meshes })
    }
}

impl<T: Real> Default for Parts<T> {
    fn default() -> Self {
        Parts {
            labels: Vec::new(),
            meshes: Vec::new(),
        }
    }
}

impl<T: Real> IntoIterator for Parts<T> {
    type Item = (Bucket, Mesh<T>);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<Bucket>, std::vec::IntoIter<Mesh<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter().zip(self.meshes)
    }
}

/// Partition the triangles of `source` into one mesh per label.
///
/// Duplicate labels are collapsed. Fails with `IndexOutOfRange` if the classifier produces a
/// bucket that is not among `labels`, in which case no output is produced.
pub fn partition<T: Real>(
    source: &Mesh<T>,
    classifier: &Classifier<T>,
    labels: &[Bucket],
) -> Result<Parts<T>, Error> {
    partition_with_progress(
        source,
        classifier,
        labels,
        DEFAULT_PROGRESS_INTERVAL,
        &mut NoProgress,
    )
}

/// Same as `partition` but reports progress every `interval` flat triangle indices.
///
/// An `interval` of zero disables reporting. `progress` is cleared once the walk ends, whether it
/// succeeded or not.
pub fn partition_with_progress<T: Real>(
    source: &Mesh<T>,
    classifier: &Classifier<T>,
    labels: &[Bucket],
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<Parts<T>, Error> {
    let result = partition_impl(source, classifier, labels, interval, progress);
    progress.clear();
    result
}

fn partition_impl<T: Real>(
    source: &Mesh<T>,
    classifier: &Classifier<T>,
    labels: &[Bucket],
    interval: usize,
    progress: &mut dyn Progress,
) -> Result<Parts<T>, Error> {
    classifier.check_vertex_pool(source)?;

    let mut slots: HashMap<Bucket, usize> = HashMap::default();
    let mut unique_labels = Vec::with_capacity(labels.len());
    for &label in labels {
        slots.entry(label).or_insert_with(|| {
            unique_labels.push(label);
            unique_labels.len() - 1
        });
    }

    let num_submeshes = source.num_submeshes();
    let mut accumulators = vec![vec![Submesh::default(); num_submeshes]; unique_labels.len()];

    for (sidx, submesh) in source.submeshes().iter().enumerate() {
        let num_indices = 3 * submesh.num_triangles();
        for (tidx, &tri) in submesh.triangle_iter().enumerate() {
            let flat_index = 3 * tidx;
            if interval > 0 && flat_index % interval == 0 {
                let label = checkpoint_label(sidx, num_submeshes, flat_index, num_indices);
                progress.report(flat_index, num_indices, &label);
            }

            let bucket = classifier.classify(tri, sidx)?;
            let slot = *slots.get(&bucket).ok_or_else(|| {
                Error::out_of_range(ElementKind::Bucket, bucket.0, unique_labels.len())
            })?;
            accumulators[slot][sidx].push(tri);
        }
    }

    let meshes: Vec<_> = accumulators
        .into_iter()
        .map(|submeshes| source.with_submeshes(submeshes))
        .collect();

    log::debug!(
        "Partitioned {} triangles in {} submeshes into {} buckets",
        source.num_triangles(),
        num_submeshes,
        meshes.len()
    );

    Ok(Parts {
        labels: unique_labels,
        meshes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::SplitRule;
    use crate::mesh::builder::*;
    use crate::mesh::{NumVertices, VertexPositions};
    use crate::ops::transform::*;
    use crate::prim::Plane;
    use crate::progress::tests::RecordingProgress;
    use math::Vector3;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Build a mesh with random vertices and random triangles spread over a few submeshes, some
    /// of which are empty.
    fn random_mesh(rng: &mut StdRng) -> Mesh<f64> {
        let num_verts = rng.random_range(3..40);
        let verts: Vec<[f64; 3]> = (0..num_verts)
            .map(|_| {
                [
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                ]
            })
            .collect();
        let num_submeshes = rng.random_range(0..5);
        let submeshes: Vec<Vec<usize>> = (0..num_submeshes)
            .map(|_| {
                let num_tris = rng.random_range(0..30);
                (0..3 * num_tris)
                    .map(|_| rng.random_range(0..num_verts))
                    .collect()
            })
            .collect();
        Mesh::from_flat_indices(verts, &submeshes).unwrap()
    }

    /// Check that each source triangle appears in the bucket it is classified into, in order,
    /// and nowhere else.
    fn assert_partition_law(source: &Mesh<f64>, classifier: &Classifier<f64>, parts: &Parts<f64>) {
        for part in parts.iter() {
            assert_eq!(part.1.num_submeshes(), source.num_submeshes());
        }
        for (sidx, submesh) in source.submeshes().iter().enumerate() {
            let mut cursors = vec![0; parts.len()];
            for &tri in submesh.triangles() {
                let bucket = classifier.classify(tri, sidx).unwrap();
                let slot = parts.labels().iter().position(|&b| b == bucket).unwrap();
                let out = parts.meshes[slot].triangles(sidx).unwrap();
                assert_eq!(out[cursors[slot]], tri);
                cursors[slot] += 1;
            }
            let total: usize = parts
                .iter()
                .map(|(_, mesh)| mesh.submesh(sidx).unwrap().num_triangles())
                .sum();
            assert_eq!(total, submesh.num_triangles());
            for (slot, (_, mesh)) in parts.iter().enumerate() {
                assert_eq!(cursors[slot], mesh.submesh(sidx).unwrap().num_triangles());
            }
        }
    }

    #[test]
    fn random_partition_law() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let mesh = random_mesh(&mut rng);
            let normal = Vector3::<f64>::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(0.1..1.0),
            )
            .normalize();
            let point = [rng.random_range(-0.5..0.5), 0.0, 0.0];
            let rule = SplitRule::ByPlane {
                plane: Plane::from_normal_and_point(normal, point),
                to_world: Transform::<f64>::identity(),
            };

            let classifier = rule.bind(&mesh).unwrap().unwrap();
            let labels = classifier.labels(mesh.num_submeshes());
            let parts = partition(&mesh, &classifier, &labels).unwrap();
            assert_eq!(parts.len(), 2);
            assert_partition_law(&mesh, &classifier, &parts);

            let by_material = Classifier::ByMaterial;
            let labels = by_material.labels(mesh.num_submeshes());
            let parts = partition(&mesh, &by_material, &labels).unwrap();
            assert_eq!(parts.len(), mesh.num_submeshes());
            assert_partition_law(&mesh, &by_material, &parts);
        }
    }

    #[test]
    fn vertex_pool_preserved() {
        let grid: Mesh<f64> = GridBuilder {
            rows: 3,
            cols: 4,
            orientation: AxisPlaneOrientation::ZX,
            submeshes: 3,
        }
        .build();
        let rule = SplitRule::by_plane(
            &QuadBuilder::new(AxisPlaneOrientation::YZ).build(),
            &Transform::<f64>::identity(),
            Transform::identity(),
        )
        .unwrap();
        let classifier = rule.bind(&grid).unwrap().unwrap();
        let parts = partition(&grid, &classifier, &[Bucket::A, Bucket::B]).unwrap();
        for (_, mesh) in parts.iter() {
            assert_eq!(mesh.num_vertices(), grid.num_vertices());
            assert_eq!(mesh.vertex_positions(), grid.vertex_positions());
        }
        assert_eq!(
            parts.iter().map(|(_, m)| m.num_triangles()).sum::<usize>(),
            grid.num_triangles()
        );
    }

    #[test]
    fn unknown_bucket() {
        let mesh = Mesh::<f32>::from_flat_indices(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[vec![0, 1, 2], vec![2, 1, 0]],
        )
        .unwrap();
        let mut progress = RecordingProgress::default();
        let result = partition_with_progress(
            &mesh,
            &Classifier::ByMaterial,
            &[Bucket(0), Bucket(0)],
            30,
            &mut progress,
        );
        assert_eq!(
            result,
            Err(Error::IndexOutOfRange {
                kind: ElementKind::Bucket,
                index: 1,
                len: 1
            })
        );
        assert_eq!(progress.clears, 1);
    }

    #[test]
    fn classifier_bound_to_another_mesh() {
        let bound = Mesh::<f64>::from_flat_indices(
            vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[vec![0, 1, 2]],
        )
        .unwrap();
        let mut verts = bound.vertex_positions().to_vec();
        verts.extend_from_slice(&[[5.0, 0.0, 0.0], [5.0, 1.0, 0.0], [5.0, 0.0, 1.0]]);
        let source = Mesh::from_flat_indices(verts, &[vec![3, 4, 5]]).unwrap();

        let classifier = Classifier::by_plane(
            Plane::from_normal_and_point(Vector3::new(1.0, 0.0, 0.0), [0.0; 3]),
            Transform::identity(),
            &bound,
        );
        let mut progress = RecordingProgress::default();
        let result = partition_with_progress(
            &source,
            &classifier,
            &[Bucket::A, Bucket::B],
            30,
            &mut progress,
        );
        assert_eq!(
            result,
            Err(Error::SizeMismatch {
                kind: ElementKind::Vertex,
                expected: 6,
                given: 3,
            })
        );
        assert!(progress.reports.is_empty());
        assert_eq!(progress.clears, 1);

        // Bound to the right pool, the far triangle lands in front.
        let classifier = Classifier::by_plane(
            Plane::from_normal_and_point(Vector3::new(1.0, 0.0, 0.0), [0.0; 3]),
            Transform::identity(),
            &source,
        );
        let parts = partition(&source, &classifier, &[Bucket::A, Bucket::B]).unwrap();
        assert_eq!(
            parts.get(Bucket::A).unwrap().triangles(0).unwrap(),
            &[[3, 4, 5]][..]
        );
    }

    #[test]
    fn empty_buckets_are_kept() {
        let mesh = Mesh::<f64>::from_flat_indices(
            vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            &[vec![0, 1, 2], vec![]],
        )
        .unwrap();
        let classifier = Classifier::by_plane(
            Plane::from_normal_and_point(Vector3::new(1.0, 0.0, 0.0), [0.0; 3]),
            Transform::identity(),
            &mesh,
        );
        let parts = partition(&mesh, &classifier, &[Bucket::A, Bucket::B]).unwrap();
        let b = parts.get(Bucket::B).unwrap();
        assert_eq!(b.num_submeshes(), 2);
        assert_eq!(b.num_triangles(), 0);
        assert!(parts.get(Bucket(7)).is_none());

        let a = parts.get(Bucket::A).unwrap();
        assert_eq!(a.triangle_indices(0).unwrap(), &[0, 1, 2]);
        assert!(a.triangle_indices(1).unwrap().is_empty());
    }

    #[test]
    fn progress_checkpoints() {
        // 25 triangles, so 75 flat indices with checkpoints at 0, 30 and 60.
        let tris: Vec<usize> = (0..75).map(|i| i % 3).collect();
        let mesh =
            Mesh::<f64>::from_flat_indices(vec![[0.0; 3]; 3], &[tris.clone(), vec![0, 1, 2]])
                .unwrap();
        let mut progress = RecordingProgress::default();
        let classifier = Classifier::ByMaterial;
        let parts =
            partition_with_progress(&mesh, &classifier, &[Bucket(0), Bucket(1)], 30, &mut progress)
                .unwrap();
        assert_eq!(parts.get(Bucket(0)).unwrap().triangle_indices(0).unwrap(), &tris[..]);
        assert_eq!(
            progress.reports,
            vec![
                (0, 75, "submesh:0/2, triangles:0/75".to_string()),
                (30, 75, "submesh:0/2, triangles:30/75".to_string()),
                (60, 75, "submesh:0/2, triangles:60/75".to_string()),
                (0, 3, "submesh:1/2, triangles:0/3".to_string()),
            ]
        );
        assert_eq!(progress.clears, 1);

        // Results do not depend on the reporting interval.
        let labels = [Bucket(0), Bucket(1)];
        let quiet = partition_with_progress(&mesh, &classifier, &labels, 0, &mut progress).unwrap();
        assert_eq!(quiet, parts);
        assert_eq!(progress.reports.len(), 4);
    }
}
