pub mod builder;
pub mod topology;
pub mod transform_impl;

pub mod material;
pub mod skin;
pub mod submesh;
pub mod tri_mesh;
pub mod vertex_positions;

// Re-export meshes and traits
pub use self::material::*;
pub use self::skin::*;
pub use self::submesh::*;
pub use self::topology::{NumSubmeshes, NumTriangles, NumVertices};
pub use self::tri_mesh::*;
pub use self::vertex_positions::*; // reexport intrinsic attribute
