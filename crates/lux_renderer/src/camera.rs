//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::Color;
use lux_math::{Ray, Vec3};
use rand::RngCore;

/// Focus distance when no lens is set.
pub const DEFAULT_FOCUS_DIST: f32 = 10.0;

/// Pinhole or thin-lens camera.
///
/// A camera must be [`configured`](Camera::configure) with a view before it
/// can generate rays; rendering with an unconfigured camera fails.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    /// Radiance of rays that escape the scene
    pub background: Color,

    // Lens settings
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    configured: bool,

    // Cached computed values (set by configure())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn new(image_width: u32, image_height: u32, background: Color) -> Self {
        Self {
            image_width,
            image_height,
            background,
            defocus_angle: 0.0,
            focus_dist: DEFAULT_FOCUS_DIST,
            configured: false,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set lens settings. Takes effect at the next [`Camera::configure`].
    pub fn with_lens(mut self, defocus_angle: f32, focus_dist: f32) -> Self {
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Place the camera and precompute the viewport.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `look_from` / `target`: eye position and the point it looks at
    /// - `vup`: approximate up direction
    pub fn configure(&mut self, vfov: f32, look_from: Vec3, target: Vec3, vup: Vec3) {
        self.center = look_from;

        // Calculate viewport dimensions
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height.max(1) as f32);

        // Calculate camera basis vectors
        let w = (look_from - target).normalize_or_zero();
        let u = vup.cross(w).normalize_or_zero();
        let v = w.cross(u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height.max(1) as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center - self.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;

        self.configured = true;

        log::debug!(
            "Camera configured: {}x{} vfov {} from {:?} to {:?}",
            self.image_width,
            self.image_height,
            vfov,
            look_from,
            target
        );
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Generate a ray through pixel (i, j).
    ///
    /// With `antialias` the sample is jittered uniformly within the pixel,
    /// otherwise it passes through the pixel center. Ray time is always
    /// random so moving primitives blur.
    pub fn get_ray(&self, i: u32, j: u32, antialias: bool, rng: &mut dyn RngCore) -> Ray {
        let offset = if antialias {
            sample_square(rng)
        } else {
            Vec3::ZERO
        };

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(width, height, Color::ZERO);
        camera.configure(90.0, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        camera
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new(10, 10, Color::ONE);
        assert!(!camera.is_configured());
        assert_eq!(camera.focus_dist, DEFAULT_FOCUS_DIST);
        assert_eq!(camera.defocus_angle, 0.0);
    }

    #[test]
    fn test_center_ray_without_antialias() {
        let camera = looking_down_z(101, 101);
        assert!(camera.is_configured());

        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, false, &mut rng);

        assert_eq!(ray.origin(), Vec3::ZERO);
        let dir = ray.direction().normalize();
        assert!((dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        assert!((0.0..1.0).contains(&ray.time()));
    }

    #[test]
    fn test_corner_rays_span_field_of_view() {
        let camera = looking_down_z(100, 100);
        let mut rng = StdRng::seed_from_u64(42);

        // 90 degree vfov: the top-left pixel is close to 45 degrees up and left
        let ray = camera.get_ray(0, 0, false, &mut rng);
        let d = ray.direction() / -ray.direction().z;
        assert!(d.x < -0.95 && d.x > -1.0);
        assert!(d.y > 0.95 && d.y < 1.0);
    }

    #[test]
    fn test_antialias_jitters_within_pixel() {
        let camera = looking_down_z(100, 100);
        let mut rng = StdRng::seed_from_u64(42);
        let pixel_width = 2.0 * DEFAULT_FOCUS_DIST / 100.0;

        let centered = camera.get_ray(30, 60, false, &mut rng);
        for _ in 0..100 {
            let jittered = camera.get_ray(30, 60, true, &mut rng);
            let offset = jittered.direction() - centered.direction();
            assert!(offset.x.abs() <= pixel_width * 0.5 + 1e-4);
            assert!(offset.y.abs() <= pixel_width * 0.5 + 1e-4);
        }
    }

    #[test]
    fn test_defocus_moves_origin() {
        let mut camera = Camera::new(50, 50, Color::ZERO).with_lens(10.0, 3.0);
        camera.configure(40.0, Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(42);

        let moved = (0..20)
            .map(|_| camera.get_ray(25, 25, false, &mut rng))
            .filter(|ray| ray.origin() != Vec3::new(0.0, 0.0, 5.0))
            .count();
        assert!(moved > 0);
    }
}
