//! Constant-density participating medium (smoke, fog).

use std::sync::Arc;

use crate::material::{Color, Isotropic};
use crate::sampling::gen_f32;
use crate::{HitRecord, Hittable, Material};
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Density used when a scene does not specify one.
pub const DEFAULT_DENSITY: f32 = 0.01;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density filling a closed boundary shape.
///
/// Rays that enter the boundary scatter at an exponentially distributed
/// distance, or pass straight through if that distance exceeds the chord.
pub struct Volume {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl Volume {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::from_color(albedo)))
    }

    pub fn with_phase(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for Volume {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY), rng)?;

        let mut t1 = entry.t.max(ray_t.min);
        let t2 = exit.t.min(ray_t.max);

        if t1 >= t2 {
            return None;
        }
        if t1 < 0.0 {
            t1 = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t2 - t1) * ray_length;
        // ln(0) is -inf, which lands beyond any boundary
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t1 + hit_distance / ray_length;

        // Normal and face are arbitrary: the phase function ignores them
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
