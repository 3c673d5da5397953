//! Parallelogram primitive.

use std::sync::Arc;

use crate::planar::PlanarPatch;
use crate::{HitRecord, Hittable, Material};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A parallelogram with corner `q` and edges `u`, `v`.
pub struct Quad {
    patch: PlanarPatch,
    material: Arc<dyn Material>,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            patch: PlanarPatch::new(q, u, v),
            material,
        }
    }

    /// Create a quad from its corner `q` and the two corners adjacent to it.
    pub fn from_points(q: Vec3, x: Vec3, y: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, x - q, y - q, material)
    }

    /// Interior test in patch coordinates; the boundary is inside.
    fn is_interior(alpha: f32, beta: f32) -> bool {
        let unit_interval = Interval::new(0.0, 1.0);
        unit_interval.contains(alpha) && unit_interval.contains(beta)
    }
}

impl Hittable for Quad {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_quad() -> Quad {
        Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(Lambertian::from_color(Vec3::ONE)),
        )
    }

    #[test]
    fn test_quad_hit_center() {
        let quad = unit_quad();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-6);
        assert!((rec.u - 0.5).abs() < 1e-6 && (rec.v - 0.5).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_quad_includes_edges() {
        let quad = unit_quad();
        let mut rng = StdRng::seed_from_u64(0);
        let ray_t = Interval::new(0.001, f32::INFINITY);

        // Bottom edge midpoint and a corner
        let edge = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -1.0, -2.0));
        let corner = Ray::new_simple(Vec3::ZERO, Vec3::new(-1.0, -1.0, -2.0));
        assert!(quad.hit(&edge, ray_t, &mut rng).is_some());
        assert!(quad.hit(&corner, ray_t, &mut rng).is_some());
    }

    #[test]
    fn test_quad_miss_outside() {
        let quad = unit_quad();
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(2.0, 0.0, -2.0));
        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).is_none());
    }

    #[test]
    fn test_quad_from_points() {
        let mat: Arc<dyn Material> = Arc::new(Lambertian::from_color(Vec3::ONE));
        let quad = Quad::from_points(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), mat);
        let bbox = quad.bounding_box();
        assert_eq!(bbox.x, Interval::new(0.0, 3.0));
        assert_eq!(bbox.z, Interval::new(0.0, 2.0));
    }
}
