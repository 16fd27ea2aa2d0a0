//!
//! Scene level split jobs.
//!
//! A split job takes an object from a [`Scene`], splits its mesh, stores every output through an
//! [`AssetStore`] and attaches each stored mesh to a clone of the source object. The source object
//! is deactivated afterwards, never deleted, so a split can be undone by reactivating it.
//!
//! [`MemoryScene`] and [`MemoryAssetStore`] provide headless in-memory implementations of the two
//! collaborators.
//!

use crate::algo::{split_with_progress, Bucket, Parts, SplitRule};
use crate::error::Error;
use crate::mesh::{BoneRef, Material, Mesh, NumTriangles};
use crate::ops::transform::Transform;
use crate::options::SplitOptions;
use crate::progress::{NoProgress, Progress};
use crate::Real;
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Persistent storage for split outputs.
pub trait AssetStore<T: Real> {
    /// Reference to a stored mesh.
    type Handle: Clone + fmt::Debug;
    type Error: std::error::Error;

    /// Create `dir` along with all missing parent folders. Existing folders are left untouched.
    fn ensure_folder_exists(&mut self, dir: &Path) -> Result<(), Self::Error>;

    /// Store `mesh` as an asset called `name` in `dir`.
    fn store(&mut self, mesh: &Mesh<T>, dir: &Path, name: &str)
        -> Result<Self::Handle, Self::Error>;
}

/// The objects a split job reads from and writes to.
///
/// `H` is the handle type of the asset store used alongside the scene.
pub trait Scene<T: Real, H> {
    type Object: Copy + fmt::Debug;

    fn name(&self, object: Self::Object) -> &str;
    /// Mesh rendered by the object, if any.
    fn mesh(&self, object: Self::Object) -> Option<&Mesh<T>>;
    fn local_to_world(&self, object: Self::Object) -> Transform<T>;
    /// Location of the asset the object's mesh was loaded from.
    fn asset_path(&self, object: Self::Object) -> Option<&Path>;
    /// Materials used to render the object, one per submesh.
    fn materials(&self, object: Self::Object) -> &[Material];
    /// Duplicate `source` under the same parent and give the copy a new name.
    fn clone_object(&mut self, source: Self::Object, name: &str) -> Self::Object;
    /// Make `object` render the stored `mesh` with the given materials.
    fn assign(&mut self, object: Self::Object, mesh: &Mesh<T>, handle: H, materials: &[Material]);
    /// Hide `object` without removing it from the scene.
    fn deactivate(&mut self, object: Self::Object);
}

/// Folder receiving the outputs of a split.
///
/// This is the folder containing the source asset, with `folder` appended unless the asset
/// already lives in a folder with that name. Sources without an asset path use `folder` relative
/// to the current directory.
pub fn submesh_dir(asset_path: Option<&Path>, folder: &str) -> PathBuf {
    let base = asset_path
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    if base.ends_with(folder) {
        base.to_path_buf()
    } else {
        base.join(folder)
    }
}

fn material_output_name(object_name: &str, material: Option<&Material>, index: usize) -> String {
    match material {
        Some(material) => format!("{}_{}", object_name, material.name),
        None => format!("{}_{}", object_name, index),
    }
}

/// Append `_{index}` to names already used by an earlier output, so every output of a job has its
/// own asset path.
fn make_names_unique<'n>(names: impl Iterator<Item = &'n mut String>) {
    let mut taken: HashSet<String> = HashSet::default();
    for (index, name) in names.enumerate() {
        if taken.insert(name.clone()) {
            continue;
        }
        let mut suffix = index;
        let mut candidate = format!("{}_{}", name, suffix);
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}_{}", name, suffix);
        }
        log::debug!("Renaming duplicate output {} to {}", name, candidate);
        taken.insert(candidate.clone());
        *name = candidate;
    }
}

/// An output that was stored and attached to a new object.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredOutput<O, H> {
    pub name: String,
    pub bucket: Bucket,
    pub object: O,
    pub handle: H,
}

/// An output the asset store refused.
#[derive(Debug)]
pub struct StoreFailure<E> {
    pub name: String,
    pub bucket: Bucket,
    pub error: E,
}

/// Outcome of a split job.
#[derive(Debug)]
pub struct SplitReport<O, H, E> {
    /// Folder the outputs were stored in.
    pub dir: PathBuf,
    pub stored: Vec<StoredOutput<O, H>>,
    /// Names of the outputs skipped because they have no triangles.
    pub skipped: Vec<String>,
    pub failures: Vec<StoreFailure<E>>,
    pub source_deactivated: bool,
}

impl<O, H, E> SplitReport<O, H, E> {
    fn new(dir: PathBuf) -> Self {
        SplitReport {
            dir,
            stored: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            source_deactivated: false,
        }
    }

    /// True if every output that was not skipped got stored.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors that abort a split job before anything is stored.
#[derive(Debug)]
pub enum JobError<E> {
    /// The split itself failed.
    Split { source: Error },
    /// The output folder could not be created.
    Folder { path: PathBuf, source: E },
    /// An object taking part in the split has no mesh.
    MissingMesh { object: String },
}

impl<E: std::error::Error + 'static> std::error::Error for JobError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobError::Split { source } => Some(source),
            JobError::Folder { source, .. } => Some(source),
            JobError::MissingMesh { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for JobError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobError::Split { source } => write!(f, "Failed to split mesh: {}", source),
            JobError::Folder { path, source } => {
                write!(f, "Failed to create folder {}: {}", path.display(), source)
            }
            JobError::MissingMesh { object } => write!(f, "Object \"{}\" has no mesh", object),
        }
    }
}

impl<E> From<Error> for JobError<E> {
    fn from(err: Error) -> JobError<E> {
        JobError::Split { source: err }
    }
}

/// Report type produced by a split job over scene `S` and asset store `A`.
pub type JobReport<T, S, A> = SplitReport<
    <S as Scene<T, <A as AssetStore<T>>::Handle>>::Object,
    <A as AssetStore<T>>::Handle,
    <A as AssetStore<T>>::Error,
>;

/// Splits scene objects and stores the results.
pub struct SplitJob<'a, T: Real, S, A> {
    scene: &'a mut S,
    store: &'a mut A,
    options: SplitOptions,
    progress: Box<dyn Progress + 'a>,
    _real: PhantomData<T>,
}

impl<'a, T, S, A> SplitJob<'a, T, S, A>
where
    T: Real,
    A: AssetStore<T>,
    S: Scene<T, A::Handle>,
{
    pub fn new(scene: &'a mut S, store: &'a mut A) -> Self {
        SplitJob {
            scene,
            store,
            options: SplitOptions::default(),
            progress: Box::new(NoProgress),
            _real: PhantomData,
        }
    }

    pub fn with_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, progress: impl Progress + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    #[inline]
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Turn every submesh of the object's mesh into its own object.
    ///
    /// Output `j` is named after the material of submesh `j` and renders with that material only.
    pub fn split_by_materials(
        &mut self,
        object: S::Object,
    ) -> Result<JobReport<T, S, A>, JobError<A::Error>> {
        let rule = SplitRule::ByMaterial;
        let parts = self.split_parts(object, &rule)?.unwrap_or_default();
        self.materialize(object, &rule, parts)
    }

    /// Split the object's mesh along the plane of the first triangle of `quad`'s mesh.
    pub fn split_by_quad(
        &mut self,
        object: S::Object,
        quad: S::Object,
    ) -> Result<JobReport<T, S, A>, JobError<A::Error>> {
        let reference = self.mesh_of(quad)?;
        let rule = SplitRule::by_plane(
            reference,
            &self.scene.local_to_world(quad),
            self.scene.local_to_world(object),
        )?;
        let parts = self.split_parts(object, &rule)?.unwrap_or_default();
        self.materialize(object, &rule, parts)
    }

    /// Split the object's mesh by the vertices owned by `bone`.
    ///
    /// Returns `Ok(None)` without touching the scene or the store if the mesh is not skinned or
    /// has no submeshes.
    pub fn split_by_bone(
        &mut self,
        object: S::Object,
        bone: &BoneRef,
    ) -> Result<Option<JobReport<T, S, A>>, JobError<A::Error>> {
        self.split_with_rule(object, &SplitRule::ByBone(bone.clone()))
    }

    /// Split the object's mesh with an arbitrary rule.
    pub fn split_with_rule(
        &mut self,
        object: S::Object,
        rule: &SplitRule<T>,
    ) -> Result<Option<JobReport<T, S, A>>, JobError<A::Error>> {
        match self.split_parts(object, rule)? {
            Some(parts) => self.materialize(object, rule, parts).map(Some),
            None => {
                log::debug!("Nothing to split in {:?}", object);
                Ok(None)
            }
        }
    }

    fn mesh_of(&self, object: S::Object) -> Result<&Mesh<T>, JobError<A::Error>> {
        self.scene
            .mesh(object)
            .ok_or_else(|| JobError::MissingMesh {
                object: self.scene.name(object).to_owned(),
            })
    }

    fn split_parts(
        &mut self,
        object: S::Object,
        rule: &SplitRule<T>,
    ) -> Result<Option<Parts<T>>, JobError<A::Error>> {
        let mesh = self
            .scene
            .mesh(object)
            .ok_or_else(|| JobError::MissingMesh {
                object: self.scene.name(object).to_owned(),
            })?;
        let parts = split_with_progress(
            mesh,
            rule,
            self.options.progress_interval,
            &mut *self.progress,
        )?;
        Ok(parts)
    }

    fn materialize(
        &mut self,
        object: S::Object,
        rule: &SplitRule<T>,
        parts: Parts<T>,
    ) -> Result<JobReport<T, S, A>, JobError<A::Error>> {
        let object_name = self.scene.name(object).to_owned();
        let source_materials = self.scene.materials(object).to_vec();
        let side_suffixes = &self.options.side_suffixes;

        let mut outputs: Vec<(String, Vec<Material>)> = parts
            .iter()
            .map(|(Bucket(i), part)| match rule {
                SplitRule::ByMaterial => {
                    let material = source_materials
                        .get(i)
                        .or_else(|| part.materials().first())
                        .cloned();
                    let name = material_output_name(&object_name, material.as_ref(), i);
                    let materials = material.map_or_else(|| source_materials.clone(), |m| vec![m]);
                    (name, materials)
                }
                SplitRule::ByPlane { .. } | SplitRule::ByBone(_) => {
                    let suffix = side_suffixes.get(i).map_or("", String::as_str);
                    (
                        format!("{}{}", object_name, suffix),
                        source_materials.clone(),
                    )
                }
            })
            .collect();
        make_names_unique(outputs.iter_mut().map(|(name, _)| name));

        let dir = submesh_dir(self.scene.asset_path(object), &self.options.submesh_folder);
        self.store
            .ensure_folder_exists(&dir)
            .map_err(|source| JobError::Folder {
                path: dir.clone(),
                source,
            })?;

        log::debug!(
            "Storing {} outputs of {} in {}",
            outputs.len(),
            object_name,
            dir.display()
        );

        let mut report = SplitReport::new(dir);
        for ((bucket, part), (name, materials)) in parts.into_iter().zip(outputs) {
            if self.options.skip_empty_outputs && part.num_triangles() == 0 {
                log::warn!("Skipping {} since it has no triangles", name);
                report.skipped.push(name);
                continue;
            }
            match self.store.store(&part, &report.dir, &name) {
                Ok(handle) => {
                    let clone = self.scene.clone_object(object, &name);
                    self.scene.assign(clone, &part, handle.clone(), &materials);
                    log::info!("Stored {}", name);
                    report.stored.push(StoredOutput {
                        name,
                        bucket,
                        object: clone,
                        handle,
                    });
                }
                Err(error) => {
                    log::warn!("Failed to store {}: {}", name, error);
                    report.failures.push(StoreFailure {
                        name,
                        bucket,
                        error,
                    });
                }
            }
        }

        if self.options.deactivate_source && report.is_complete() {
            self.scene.deactivate(object);
            report.source_deactivated = true;
        }
        Ok(report)
    }
}

/*
 * In-memory collaborators
 */

/// Identifier of an object in a [`MemoryScene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// An object of a [`MemoryScene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject<T: Real, H> {
    pub name: String,
    pub mesh: Option<Mesh<T>>,
    /// Stored asset backing `mesh`, set once a split output is assigned.
    pub asset: Option<H>,
    pub asset_path: Option<PathBuf>,
    pub local_to_world: Transform<T>,
    pub materials: Vec<Material>,
    pub active: bool,
}

impl<T: Real, H> SceneObject<T, H> {
    pub fn new(name: impl Into<String>) -> Self {
        SceneObject {
            name: name.into(),
            mesh: None,
            asset: None,
            asset_path: None,
            local_to_world: Transform::identity(),
            materials: Vec::new(),
            active: true,
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh<T>) -> Self {
        self.materials = mesh.materials().to_vec();
        self.mesh = Some(mesh);
        self
    }

    pub fn with_asset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn with_transform(mut self, local_to_world: Transform<T>) -> Self {
        self.local_to_world = local_to_world;
        self
    }

    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }
}

/// A flat list of objects kept in memory.
///
/// Object identifiers are only valid for the scene that issued them. Passing a foreign
/// identifier to any of the `Scene` methods panics.
#[derive(Clone, Debug)]
pub struct MemoryScene<T: Real, H = AssetId> {
    objects: Vec<SceneObject<T, H>>,
}

impl<T: Real, H> Default for MemoryScene<T, H> {
    fn default() -> Self {
        MemoryScene {
            objects: Vec::new(),
        }
    }
}

impl<T: Real, H> MemoryScene<T, H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject<T, H>) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject<T, H>> {
        self.objects.get(id.0)
    }

    /// Find the first object with the given name.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|object| object.name == name)
            .map(ObjectId)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<T: Real, H: Clone> Scene<T, H> for MemoryScene<T, H> {
    type Object = ObjectId;

    fn name(&self, object: ObjectId) -> &str {
        &self.objects[object.0].name
    }

    fn mesh(&self, object: ObjectId) -> Option<&Mesh<T>> {
        self.objects[object.0].mesh.as_ref()
    }

    fn local_to_world(&self, object: ObjectId) -> Transform<T> {
        self.objects[object.0].local_to_world
    }

    fn asset_path(&self, object: ObjectId) -> Option<&Path> {
        self.objects[object.0].asset_path.as_deref()
    }

    fn materials(&self, object: ObjectId) -> &[Material] {
        &self.objects[object.0].materials
    }

    fn clone_object(&mut self, source: ObjectId, name: &str) -> ObjectId {
        let mut clone = self.objects[source.0].clone();
        clone.name = name.to_owned();
        self.add(clone)
    }

    fn assign(&mut self, object: ObjectId, mesh: &Mesh<T>, handle: H, materials: &[Material]) {
        let object = &mut self.objects[object.0];
        object.mesh = Some(mesh.clone());
        object.asset = Some(handle);
        object.materials = materials.to_vec();
    }

    fn deactivate(&mut self, object: ObjectId) {
        self.objects[object.0].active = false;
    }
}

/// Identifier of an asset in a [`MemoryAssetStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum MemoryStoreError {
    /// The destination folder was never created.
    MissingFolder { path: PathBuf },
    /// An asset already exists at the destination.
    AssetExists { path: PathBuf },
}

impl std::error::Error for MemoryStoreError {}

impl fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryStoreError::MissingFolder { path } => {
                write!(f, "Folder {} does not exist", path.display())
            }
            MemoryStoreError::AssetExists { path } => {
                write!(f, "An asset already exists at {}", path.display())
            }
        }
    }
}

/// An asset store keeping meshes in memory, keyed by `dir/name`.
#[derive(Clone, Debug)]
pub struct MemoryAssetStore<T: Real> {
    folders: HashSet<PathBuf>,
    paths: HashMap<PathBuf, AssetId>,
    assets: Vec<(PathBuf, Mesh<T>)>,
}

impl<T: Real> Default for MemoryAssetStore<T> {
    fn default() -> Self {
        MemoryAssetStore {
            folders: HashSet::default(),
            paths: HashMap::default(),
            assets: Vec::new(),
        }
    }
}

impl<T: Real> MemoryAssetStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: AssetId) -> Option<&Mesh<T>> {
        self.assets.get(id.0).map(|(_, mesh)| mesh)
    }

    pub fn find(&self, path: impl AsRef<Path>) -> Option<AssetId> {
        self.paths.get(path.as_ref()).copied()
    }

    pub fn path(&self, id: AssetId) -> Option<&Path> {
        self.assets.get(id.0).map(|(path, _)| path.as_path())
    }

    pub fn has_folder(&self, dir: impl AsRef<Path>) -> bool {
        self.folders.contains(dir.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<T: Real> AssetStore<T> for MemoryAssetStore<T> {
    type Handle = AssetId;
    type Error = MemoryStoreError;

    fn ensure_folder_exists(&mut self, dir: &Path) -> Result<(), MemoryStoreError> {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() || !self.folders.insert(ancestor.to_path_buf()) {
                break;
            }
        }
        Ok(())
    }

    fn store(
        &mut self,
        mesh: &Mesh<T>,
        dir: &Path,
        name: &str,
    ) -> Result<AssetId, MemoryStoreError> {
        if !dir.as_os_str().is_empty() && !self.folders.contains(dir) {
            return Err(MemoryStoreError::MissingFolder {
                path: dir.to_path_buf(),
            });
        }
        let path = dir.join(name);
        if self.paths.contains_key(&path) {
            return Err(MemoryStoreError::AssetExists { path });
        }
        let id = AssetId(self.assets.len());
        self.paths.insert(path.clone(), id);
        self.assets.push((path, mesh.clone()));
        Ok(id)
    }
}
