//! Plane-anchored patch shared by quads and triangles.

use lux_math::{Aabb, Interval, Ray, Vec3};

/// Rays closer to parallel than this are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A patch of the plane through `q` spanned by the edges `u` and `v`.
///
/// Hits are reported in patch coordinates `(alpha, beta)` such that the hit
/// point is `q + alpha * u + beta * v`; each shape decides which coordinates
/// count as interior.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanarPatch {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    normal: Vec3,
    d: f32,
    bbox: Aabb,
}

/// A ray/plane intersection before the interior test.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneHit {
    pub t: f32,
    pub alpha: f32,
    pub beta: f32,
}

impl PlanarPatch {
    pub fn new(q: Vec3, u: Vec3, v: Vec3) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);

        let n_len_sq = n.length_squared();
        let w = if n_len_sq > 0.0 { n / n_len_sq } else { Vec3::ZERO };

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Intersect the ray with the patch's plane inside `ray_t`.
    pub fn hit_plane(&self, ray: &Ray, ray_t: Interval) -> Option<PlaneHit> {
        let denom = self.normal.dot(ray.direction());

        // No hit if the ray is parallel to the plane
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hitpt_vector = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));

        Some(PlaneHit { t, alpha, beta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_coordinates() {
        let patch = PlanarPatch::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = patch.hit_plane(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-6);
        assert!((hit.alpha - 0.5).abs() < 1e-6);
        assert!((hit.beta - 0.5).abs() < 1e-6);
        assert_eq!(patch.normal(), Vec3::Z);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let patch = PlanarPatch::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert!(patch.hit_plane(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_plane_outside_interval() {
        let patch = PlanarPatch::new(Vec3::new(0.0, 0.0, -5.0), Vec3::X, Vec3::Y);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(patch.hit_plane(&ray, Interval::new(0.001, 4.0)).is_none());
        assert!(patch.hit_plane(&ray, Interval::new(0.001, 6.0)).is_some());
    }

    #[test]
    fn test_flat_bbox_is_padded() {
        let patch = PlanarPatch::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let bbox = patch.bounding_box();
        assert!(bbox.z.size() >= lux_math::MIN_THICKNESS * 0.999);
        assert_eq!(bbox.x, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_degenerate_edges_never_hit() {
        let patch = PlanarPatch::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
        assert!(patch.hit_plane(&ray, Interval::UNIVERSE).is_none());
    }
}
