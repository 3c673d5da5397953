//! Polygon mesh input for the path tracer.
//!
//! A mesh is stored the way the renderer consumes it: an ordered list of
//! face vertices and a parallel list of per-face vertex counts. Face `n`
//! owns the `face_vertex_counts[n]` positions that follow those of face
//! `n - 1`.

use std::path::Path;

use lux_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Face counts cover {expected} vertices but {actual} positions were given")]
    Malformed { expected: usize, actual: usize },

    #[error("OBJ index {index} out of range ({count} positions)")]
    IndexOutOfRange { index: u32, count: usize },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A polygon mesh as a flat face-vertex list.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Mesh name (from the OBJ object/group, may be empty)
    pub name: String,

    /// Face vertex positions, face after face
    pub positions: Vec<Vec3>,

    /// Number of vertices in each face (3 or 4 for renderable faces)
    pub face_vertex_counts: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from face vertices and face sizes.
    pub fn new(positions: Vec<Vec3>, face_vertex_counts: Vec<u32>) -> MeshResult<Self> {
        let expected: usize = face_vertex_counts.iter().map(|&c| c as usize).sum();
        if expected != positions.len() {
            return Err(MeshError::Malformed {
                expected,
                actual: positions.len(),
            });
        }

        let bounds = Self::compute_bounds(&positions);
        Ok(Self {
            name: String::new(),
            positions,
            face_vertex_counts,
            bounds,
        })
    }

    /// Builder method to set the mesh name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load every model of an OBJ file as a separate mesh.
    ///
    /// Faces are kept as authored (not triangulated) so quads stay quads.
    pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Vec<Mesh>> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: false,
                ..Default::default()
            },
        )?;

        let meshes = models
            .into_iter()
            .map(|model| Self::from_tobj(model.name, &model.mesh))
            .collect::<MeshResult<Vec<_>>>()?;

        log::debug!(
            "Loaded {} mesh(es) from {} ({} faces)",
            meshes.len(),
            path.display(),
            meshes.iter().map(Mesh::face_count).sum::<usize>()
        );

        Ok(meshes)
    }

    fn from_tobj(name: String, mesh: &tobj::Mesh) -> MeshResult<Self> {
        let vertices: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        let positions = mesh
            .indices
            .iter()
            .map(|&index| {
                vertices
                    .get(index as usize)
                    .copied()
                    .ok_or(MeshError::IndexOutOfRange {
                        index,
                        count: vertices.len(),
                    })
            })
            .collect::<MeshResult<Vec<_>>>()?;

        // tobj leaves face_arities empty when every face is a triangle
        let face_vertex_counts = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.clone()
        };

        Ok(Self::new(positions, face_vertex_counts)?.with_name(name))
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );

        Aabb::from_points(min, max)
    }

    /// Iterate over faces as slices of their vertex positions.
    pub fn faces(&self) -> impl Iterator<Item = &[Vec3]> + '_ {
        let mut start = 0;
        self.face_vertex_counts.iter().map(move |&count| {
            let face = &self.positions[start..start + count as usize];
            start += count as usize;
            face
        })
    }

    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
