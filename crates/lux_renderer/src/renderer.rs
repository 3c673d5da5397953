//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance with a hard bounce budget
//! - Jittered multi-sampling for anti-aliasing
//! - Parallel bucket rendering with per-bucket random streams
//! - Square-root gamma on output

use std::path::Path;
use std::time::Instant;

use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, DiagnosticSink, Hittable};
use lux_math::{Interval, Ray};

/// Lower bound of secondary ray intervals; suppresses self-intersection.
pub const SHADOW_ACNE_BIAS: f32 = 0.001;

/// Errors that end a render without producing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Camera must be configured before rendering")]
    NotConfigured,

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid render config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure of a single camera sample. The sample is dropped, not the render.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    #[error("Non-finite radiance ({r}, {g}, {b}) at pixel ({x}, {y})")]
    NonFinite {
        x: u32,
        y: u32,
        r: f32,
        g: f32,
        b: f32,
    },
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Jitter samples within the pixel; off means one centered sample
    pub antialias: bool,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Seed of the per-bucket random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            antialias: true,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded render config from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Samples actually taken per pixel.
    pub fn effective_samples(&self) -> u32 {
        if self.antialias {
            self.samples_per_pixel.max(1)
        } else {
            1
        }
    }
}

/// Compute the radiance carried back along a ray.
///
/// This is the core path tracing function: emission at the hit plus the
/// attenuated radiance of the scattered ray, until the bounce budget runs out.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_BIAS, f32::INFINITY), rng) else {
        return background;
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered = radiance(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered
        }
        // Ray was absorbed - just return emission
        None => emission,
    }
}

/// Trace one camera sample through pixel (x, y).
pub fn sample(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Result<Color, SampleError> {
    let ray = camera.get_ray(x, y, config.antialias, rng);
    let color = radiance(&ray, world, config.max_depth, camera.background, rng);

    if color.is_finite() {
        Ok(color)
    } else {
        Err(SampleError::NonFinite {
            x,
            y,
            r: color.x,
            g: color.y,
            b: color.z,
        })
    }
}

/// Render a single pixel with multi-sampling.
///
/// Failed samples are reported to `sink` and contribute nothing, but still
/// count towards the average.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    sink: &dyn DiagnosticSink,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.effective_samples();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        match sample(camera, world, x, y, config, rng) {
            Ok(color) => pixel_color += color,
            Err(e) => sink.report(&e.to_string()),
        }
    }

    pixel_color / samples as f32
}

/// Image of linear colours, row-major from the top-left pixel.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb8(*c)).collect()
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render the whole image.
///
/// Buckets are traced in parallel; each owns a random stream derived from
/// `config.seed`, so a fixed seed gives the same image on any thread count.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    sink: &dyn DiagnosticSink,
) -> Result<ImageBuffer, RenderError> {
    if !camera.is_configured() {
        return Err(RenderError::NotConfigured);
    }

    let (width, height) = (camera.image_width, camera.image_height);
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidResolution { width, height });
    }

    let buckets = generate_buckets(width, height, config.bucket_size);
    log::info!(
        "Rendering {}x{} at {} spp in {} buckets on {} threads",
        width,
        height,
        config.effective_samples(),
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, world, config, sink))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, Lambertian, MemorySink, Scene, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn sphere_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::from_color(Color::new(0.5, 0.5, 0.5))),
        )));
        scene
    }

    fn camera(width: u32, height: u32, background: Color) -> Camera {
        let mut camera = Camera::new(width, height, background);
        camera.configure(90.0, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        camera
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::splat(7.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::new(0.25, -1.0, 0.0)), [128, 0, 0]);
    }

    #[test]
    fn test_radiance_depth_zero_is_black() {
        let mut scene = Scene::new();
        scene.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(DiffuseLight::from_color(Color::splat(10.0))),
        )));
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(radiance(&ray, &scene, 0, Color::ONE, &mut rng), Color::ZERO);
        assert_eq!(radiance(&ray, &scene, 1, Color::ONE, &mut rng), Color::splat(10.0));
    }

    #[test]
    fn test_radiance_miss_returns_background() {
        let scene = sphere_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let background = Color::new(0.5, 0.7, 1.0);

        assert_eq!(radiance(&ray, &scene, 10, background, &mut rng), background);
    }

    #[test]
    fn test_render_pixel() {
        let scene = sphere_scene();
        let camera = camera(10, 10, Color::new(0.5, 0.7, 1.0));
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            ..Default::default()
        };
        let sink = MemorySink::new();
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel hits the sphere
        let color = render_pixel(&camera, &scene, 5, 5, &config, &sink, &mut rng);
        assert!(color.length() > 0.0);
        assert_ne!(color, camera.background);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_non_finite_samples_are_reported_and_skipped() {
        let mut scene = Scene::new();
        scene.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.9,
            Arc::new(DiffuseLight::from_color(Color::splat(f32::NAN))),
        )));
        let camera = camera(4, 4, Color::ZERO);
        let config = RenderConfig {
            samples_per_pixel: 3,
            max_depth: 5,
            ..Default::default()
        };
        let sink = MemorySink::new();
        let mut rng = StdRng::seed_from_u64(3);

        let color = render_pixel(&camera, &scene, 2, 2, &config, &sink, &mut rng);
        assert_eq!(color, Color::ZERO);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_render_requires_configured_camera() {
        let scene = sphere_scene();
        let camera = Camera::new(8, 8, Color::ZERO);
        let result = render(&camera, &scene, &RenderConfig::default(), &MemorySink::new());
        assert!(matches!(result, Err(RenderError::NotConfigured)));
    }

    #[test]
    fn test_render_rejects_empty_resolution() {
        let scene = sphere_scene();
        let camera = camera(0, 8, Color::ZERO);
        let result = render(&camera, &scene, &RenderConfig::default(), &MemorySink::new());
        assert!(matches!(
            result,
            Err(RenderError::InvalidResolution { width: 0, height: 8 })
        ));
    }

    #[test]
    fn test_render_is_reproducible_for_seed() {
        let scene = sphere_scene();
        let camera = camera(24, 16, Color::new(0.5, 0.7, 1.0));
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 4,
            bucket_size: 8,
            seed: 9,
            ..Default::default()
        };
        let sink = MemorySink::new();

        let a = render(&camera, &scene, &config, &sink).unwrap();
        let b = render(&camera, &scene, &config, &sink).unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.to_rgb8().len(), 24 * 16 * 3);
    }

    #[test]
    fn test_config_json_defaults() {
        let config = RenderConfig::from_json_str(r#"{ "samples_per_pixel": 8, "antialias": false }"#).unwrap();
        assert_eq!(config.samples_per_pixel, 8);
        assert!(!config.antialias);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);
        assert_eq!(config.effective_samples(), 1);

        assert!(RenderConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{ "seed": 17, "bucket_size": 32 }"#).unwrap();

        let config = RenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 17);
        assert_eq!(config.bucket_size, 32);
        assert!(matches!(
            RenderConfig::from_json_file(dir.path().join("missing.json")),
            Err(RenderError::Io(_))
        ));
    }
}
