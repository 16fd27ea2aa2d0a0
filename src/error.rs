//! Error type shared by the mesh model, the classifiers and the partitioner.

use std::fmt;

/// Kind of element an index or a size refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Submesh,
    Bucket,
    Material,
    BoneWeight,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Submesh => "submesh",
            ElementKind::Bucket => "bucket",
            ElementKind::Material => "material",
            ElementKind::BoneWeight => "bone weight",
        };
        f.write_str(name)
    }
}

/// Errors raised while building meshes or splitting them.
///
/// Split operations either return all of their outputs or one of these errors; there is no
/// partial result.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A bone weight split was requested on a mesh whose skin has an unbounded number of
    /// influences per vertex.
    UnsupportedSkinLayout,
    /// The named bone is not part of the mesh's bone list.
    BoneNotFound(String),
    /// An index is outside the bounds of the collection it refers to.
    IndexOutOfRange {
        /// What the index refers to.
        kind: ElementKind,
        /// The offending index.
        index: usize,
        /// Number of elements in the indexed collection.
        len: usize,
    },
    /// A flat triangle index list whose length is not a multiple of 3.
    MalformedTriangleList {
        /// Position of the submesh within the mesh.
        submesh: usize,
        /// Length of the given index list.
        len: usize,
    },
    /// Per-element data whose size does not match the number of elements.
    SizeMismatch {
        /// What the data is attached to.
        kind: ElementKind,
        /// Number of elements in the mesh.
        expected: usize,
        /// Number of entries given.
        given: usize,
    },
    /// The reference mesh of a plane split has no triangle to build the plane from.
    MissingReferenceTriangle,
    /// The reference triangle of a plane split has collinear vertices.
    DegeneratePlane,
}

impl Error {
    pub(crate) fn out_of_range(kind: ElementKind, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { kind, index, len }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnsupportedSkinLayout => write!(
                f,
                "Skin layouts with an unlimited number of bone influences are not supported"
            ),
            Error::BoneNotFound(bone) => {
                write!(f, "The bone \"{}\" is not part of the mesh", bone)
            }
            Error::IndexOutOfRange { kind, index, len } => write!(
                f,
                "The {} index {} is out of range for {} elements",
                kind, index, len
            ),
            Error::MalformedTriangleList { submesh, len } => write!(
                f,
                "Submesh {} has {} indices, which is not a multiple of 3",
                submesh, len
            ),
            Error::SizeMismatch {
                kind,
                expected,
                given,
            } => write!(
                f,
                "Given {} data size: {}, does not match expected size: {}",
                kind, given, expected
            ),
            Error::MissingReferenceTriangle => {
                write!(f, "The reference mesh has no triangle to build a cut plane from")
            }
            Error::DegeneratePlane => {
                write!(f, "The reference triangle is degenerate and does not define a plane")
            }
        }
    }
}
