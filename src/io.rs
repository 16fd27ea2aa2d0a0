//! IO module for mesh files.
//!
//! Meshes are loaded from and saved to Wavefront `obj` files via [`obj`](https://crates.io/obj).
//! Each submesh is written as its own group and its material, if any, as a `usemtl` reference.
//!
//! [`ObjAssetStore`] plugs this into a [`SplitJob`](crate::scene::SplitJob) by writing every split
//! output to `<root>/<dir>/<name>.obj`.
use std::path::{Path, PathBuf};

use ahash::AHashSet as HashSet;

use crate::mesh::{Mesh, NumTriangles};
use crate::scene::AssetStore;

pub mod obj;

pub trait Real: crate::Real + std::str::FromStr {}
impl<T> Real for T where T: crate::Real + std::str::FromStr {}

/// A trait for file specific object models to extract mesh data from.
pub trait MeshExtractor<T: crate::Real> {
    /// Constructs a `Mesh` from this model.
    ///
    /// This function may clone the given model as necessary.
    fn extract_mesh(&self) -> Result<Mesh<T>, Error>;
}

/// Load a mesh from a given file.
pub fn load_mesh<T: Real, P: AsRef<Path>>(file: P) -> Result<Mesh<T>, Error> {
    load_mesh_impl(file.as_ref())
}

fn load_mesh_impl<T: Real>(file: &Path) -> Result<Mesh<T>, Error> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("obj") => {
            let obj = obj::Obj::load_with_config(file, obj::LoadConfig { strict: false })?;
            obj.data.extract_mesh()
        }
        _ => Err(Error::UnsupportedFileFormat),
    }
}

/// Save a mesh to a file.
pub fn save_mesh<T: Real, P: AsRef<Path>>(mesh: &Mesh<T>, file: P) -> Result<(), Error> {
    save_mesh_impl(mesh, file.as_ref())
}

fn save_mesh_impl<T: Real>(mesh: &Mesh<T>, file: &Path) -> Result<(), Error> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("obj") => {
            let name = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(obj::DEFAULT_OBJECT_NAME);
            let obj = obj::convert_mesh_to_obj_format(mesh, name)?;
            obj.save(file)?;
            Ok(())
        }
        _ => Err(Error::UnsupportedFileFormat),
    }
}

/// An [`AssetStore`] writing every mesh to an `obj` file below a root folder.
///
/// Folders passed to the store are interpreted relative to the root, and stored meshes are
/// referred to by the path of the written file. Files left by earlier runs are overwritten, but a
/// file written by this store is never replaced: storing to the same path twice fails with
/// `AssetExists`.
#[derive(Clone, Debug)]
pub struct ObjAssetStore {
    root: PathBuf,
    written: HashSet<PathBuf>,
}

impl ObjAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ObjAssetStore {
            root: root.into(),
            written: HashSet::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file an asset called `name` in `dir` is written to.
    pub fn asset_path(&self, dir: &Path, name: &str) -> PathBuf {
        self.root.join(dir).join(format!("{}.obj", name))
    }
}

impl<T: Real> AssetStore<T> for ObjAssetStore {
    type Handle = PathBuf;
    type Error = Error;

    fn ensure_folder_exists(&mut self, dir: &Path) -> Result<(), Error> {
        let path = self.root.join(dir);
        if !path.is_dir() {
            log::debug!("Creating folder {}", path.display());
        }
        std::fs::create_dir_all(&path)?;
        Ok(())
    }

    fn store(&mut self, mesh: &Mesh<T>, dir: &Path, name: &str) -> Result<PathBuf, Error> {
        let path = self.asset_path(dir, name);
        if self.written.contains(&path) {
            return Err(Error::AssetExists { path });
        }
        save_mesh(mesh, &path)?;
        self.written.insert(path.clone());
        log::debug!(
            "Wrote {} triangles to {}",
            mesh.num_triangles(),
            path.display()
        );
        Ok(path)
    }
}

#[derive(Debug)]
pub enum Error {
    IO { source: std::io::Error },
    Obj { source: obj::ObjError },
    Mesh { source: crate::Error },
    UnsupportedFileFormat,
    /// The store already wrote a mesh to this path.
    AssetExists { path: PathBuf },
    /// A polygon with other than three vertices was found in the file.
    NonTriangularFace { vertices: usize },
    /// A vertex position cannot be represented in the target scalar type.
    UnrepresentablePosition { vertex: usize },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO { source } => Some(source),
            Error::Obj { source } => Some(source),
            Error::Mesh { source } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IO { source } => write!(f, "IO Error: {}", source),
            Error::Obj { source } => write!(f, "An OBJ file error occurred: {}", source),
            Error::Mesh { source } => write!(f, "Invalid mesh data: {}", source),
            Error::UnsupportedFileFormat => write!(f, "Unsupported file format specified"),
            Error::AssetExists { path } => {
                write!(f, "An asset was already stored at {}", path.display())
            }
            Error::NonTriangularFace { vertices } => {
                write!(f, "Found a face with {} vertices, expected triangles", vertices)
            }
            Error::UnrepresentablePosition { vertex } => {
                write!(f, "Position of vertex {} is out of range", vertex)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IO { source: err }
    }
}

impl From<obj::ObjError> for Error {
    fn from(err: obj::ObjError) -> Error {
        Error::Obj { source: err }
    }
}

impl From<crate::Error> for Error {
    fn from(err: crate::Error) -> Error {
        Error::Mesh { source: err }
    }
}
