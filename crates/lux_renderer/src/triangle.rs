//! Triangle primitive.
//!
//! Shares the plane-anchored patch with [`crate::Quad`] and only differs in
//! which patch coordinates count as interior.

use std::sync::Arc;

use crate::planar::PlanarPatch;
use crate::{HitRecord, Hittable, Material};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A triangle with vertices `q`, `q + u` and `q + v`.
pub struct Triangle {
    patch: PlanarPatch,
    material: Arc<dyn Material>,
}

impl Triangle {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            patch: PlanarPatch::new(q, u, v),
            material,
        }
    }

    /// Create a triangle from its three vertices.
    pub fn from_points(q: Vec3, x: Vec3, y: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, x - q, y - q, material)
    }

    /// Strict barycentric test: points on the edges are outside.
    fn is_interior(alpha: f32, beta: f32) -> bool {
        alpha > 0.0 && beta > 0.0 && alpha + beta < 1.0
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let hit = self.patch.hit_plane(ray, ray_t)?;
        if !Self::is_interior(hit.alpha, hit.beta) {
            return None;
        }

        Some(
            HitRecord::new(ray, hit.t, self.patch.normal(), self.material.as_ref())
                .with_uv(hit.alpha, hit.beta),
        )
    }

    fn bounding_box(&self) -> Aabb {
        self.patch.bounding_box()
    }
}
