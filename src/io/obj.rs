use objio::{Group, IndexTuple, Object, SimplePolygon};

use crate::mesh::{Material, Mesh, Submesh, VertexPositions};
use crate::Real;

use super::MeshExtractor;

pub use objio::ObjError;
pub use objio::{LoadConfig, Obj, ObjData, ObjMaterial};

pub use super::Error;

pub(crate) const DEFAULT_OBJECT_NAME: &str = "default";

/// Name of the group holding the triangles of submesh `index`.
pub fn submesh_group_name(index: usize) -> String {
    format!("submesh{}", index)
}

fn material_name(material: &ObjMaterial) -> &str {
    match material {
        ObjMaterial::Ref(name) => name,
        ObjMaterial::Mtl(mtl) => &mtl.name,
    }
}

impl<T: Real> MeshExtractor<T> for ObjData {
    /// Every group becomes one submesh, in file order.
    ///
    /// Materials are bound only if at least one group uses a material; groups without one then
    /// fall back to a material called `default`.
    fn extract_mesh(&self) -> Result<Mesh<T>, Error> {
        let pts = self
            .position
            .iter()
            .enumerate()
            .map(|(vertex, &[a, b, c])| {
                match (T::from(a), T::from(b), T::from(c)) {
                    (Some(x), Some(y), Some(z)) => Ok([x, y, z]),
                    _ => Err(Error::UnrepresentablePosition { vertex }),
                }
            })
            .collect::<Result<Vec<[T; 3]>, Error>>()?;

        let groups: Vec<&Group> = self
            .objects
            .iter()
            .flat_map(|object| object.groups.iter())
            .collect();

        let submeshes = groups
            .iter()
            .map(|group| {
                let triangles = group
                    .polys
                    .iter()
                    .map(|poly| match poly.0.as_slice() {
                        [a, b, c] => Ok([a.0, b.0, c.0]),
                        verts => Err(Error::NonTriangularFace {
                            vertices: verts.len(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Submesh::new(triangles))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let materials = if groups.iter().any(|group| group.material.is_some()) {
            groups
                .iter()
                .map(|group| {
                    Material::new(
                        group
                            .material
                            .as_ref()
                            .map_or(DEFAULT_OBJECT_NAME, material_name),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Mesh::new(pts, submeshes)?.with_materials(materials)?)
    }
}

/// Converts a mesh into a single `obj` object called `name` with one group per submesh.
pub fn convert_mesh_to_obj_format<T: Real>(mesh: &Mesh<T>, name: &str) -> Result<ObjData, Error> {
    let position = mesh
        .vertex_position_iter()
        .enumerate()
        .map(|(vertex, &[a, b, c])| match (a.to_f32(), b.to_f32(), c.to_f32()) {
            (Some(x), Some(y), Some(z)) => Ok([x, y, z]),
            _ => Err(Error::UnrepresentablePosition { vertex }),
        })
        .collect::<Result<Vec<[f32; 3]>, Error>>()?;

    let groups = mesh
        .submeshes()
        .iter()
        .enumerate()
        .map(|(i, submesh)| {
            let polys = submesh
                .triangle_iter()
                .map(|tri| SimplePolygon(tri.iter().map(|&v| IndexTuple(v, None, None)).collect()))
                .collect();
            Ok(Group {
                name: submesh_group_name(i),
                index: 0,
                material: mesh
                    .material(i)?
                    .map(|material| ObjMaterial::Ref(material.name.clone())),
                polys,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(ObjData {
        position,
        texture: Vec::new(),
        normal: Vec::new(),
        objects: vec![Object {
            name: name.to_string(),
            groups,
        }],
        material_libs: Vec::new(),
    })
}
