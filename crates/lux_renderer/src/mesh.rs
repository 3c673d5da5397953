//! Conversion of loaded meshes into renderable triangles.

use std::sync::Arc;

use crate::{Hittable, Material, Triangle};
use lux_core::Mesh;

/// Turn every face of `mesh` into triangles sharing `material`.
///
/// Triangles map to one primitive, quads `(a, b, c, d)` to `(a, b, d)` and
/// `(c, b, d)`. Faces with any other vertex count are skipped.
pub fn mesh_triangles(mesh: &Mesh, material: Arc<dyn Material>) -> Vec<Arc<dyn Hittable>> {
    let mut triangles: Vec<Arc<dyn Hittable>> = Vec::with_capacity(mesh.face_count() * 2);
    let mut skipped = 0;

    for face in mesh.faces() {
        match *face {
            [a, b, c] => {
                triangles.push(Arc::new(Triangle::from_points(a, b, c, material.clone())));
            }
            [a, b, c, d] => {
                triangles.push(Arc::new(Triangle::from_points(a, b, d, material.clone())));
                triangles.push(Arc::new(Triangle::from_points(c, b, d, material.clone())));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!(
            "Mesh '{}': skipped {} face(s) that are neither triangles nor quads",
            mesh.name,
            skipped
        );
    }

    triangles
}
