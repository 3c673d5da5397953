//! Lux renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer over shared, immutable scene data:
//! primitives answer the [`Hittable`] contract, a [`BvhNode`] accelerates
//! intersection, and [`render`] traces buckets of pixels in parallel.

mod bucket;
mod bvh;
mod camera;
mod diagnostics;
mod hittable;
mod material;
mod mesh;
mod output;
mod perlin;
mod planar;
mod quad;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;
mod triangle;
mod volume;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, DEFAULT_FOCUS_DIST};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink};
pub use hittable::{HitRecord, Hittable};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use mesh::mesh_triangles;
pub use output::{save_png, save_ppm, write_ppm};
pub use perlin::Perlin;
pub use quad::Quad;
pub use renderer::{
    color_to_rgb8, linear_to_gamma, radiance, render, render_pixel, sample, ImageBuffer,
    RenderConfig, RenderError, SampleError, SHADOW_ACNE_BIAS,
};
pub use sampling::{
    gen_f32, gen_index, gen_range_f32, random_in_unit_disk, random_unit_vector, random_vec3,
    sample_square,
};
pub use scene::{MaterialKind, MaterialParams, Scene, TextureKind, FALLBACK_COLOR};
pub use sphere::Sphere;
pub use texture::{
    Checker, Hashed, ImageTexture, NoiseTexture, Rainbow, SolidColor, Sunset, Texture,
    MISSING_IMAGE_COLOR,
};
pub use triangle::Triangle;
pub use volume::{Volume, DEFAULT_DENSITY};

/// Re-export math types from lux_math
pub use lux_math::{Aabb, Interval, Ray, Vec3};
