//! Textures: pure functions from surface coordinates to colour.

use std::sync::Arc;

use crate::material::Color;
use crate::perlin::{generate_perm, Perlin};
use crate::sampling::gen_f32;
use lux_core::ImageData;
use lux_math::{Interval, Vec3};
use rand::RngCore;

/// Returned by image textures whose file could not be decoded.
pub const MISSING_IMAGE_COLOR: Color = Color::new(2.55, 2.09, 2.2);

const HASH_COUNT: usize = 256;

/// A colour lookup over texture coordinates and the world-space hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant colour.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// Nearest-neighbour lookup into a decoded image.
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.is_empty() {
            return MISSING_IMAGE_COLOR;
        }

        // Flip V so v = 0 is the bottom row
        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;
        let [r, g, b] = self.image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Red at the bottom of a shape fading to blue at its top.
#[derive(Debug, Clone, Copy)]
pub struct Sunset {
    min_height: f32,
    max_height: f32,
}

impl Sunset {
    pub fn new(min_height: f32, max_height: f32) -> Self {
        Self {
            min_height,
            max_height,
        }
    }
}

impl Texture for Sunset {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let span = self.max_height - self.min_height;
        let normalized = if span > 0.0 {
            ((p.y - self.min_height) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Color::new(2.55 * (1.0 - normalized), 0.0, 2.55 * normalized)
    }
}

/// Seven horizontal colour bands spread over a shape's height.
#[derive(Debug, Clone, Copy)]
pub struct Rainbow {
    min_height: f32,
    max_height: f32,
}

impl Rainbow {
    const BANDS: [Color; 7] = [
        Color::new(2.55, 0.0, 0.0),
        Color::new(2.55, 1.27, 0.0),
        Color::new(2.55, 2.55, 0.0),
        Color::new(0.0, 2.55, 0.0),
        Color::new(0.0, 0.0, 2.55),
        Color::new(0.75, 0.0, 1.3),
        Color::new(1.48, 0.0, 2.11),
    ];

    pub fn new(min_height: f32, max_height: f32) -> Self {
        Self {
            min_height,
            max_height,
        }
    }

    fn band(&self, y: f32) -> usize {
        let count = Self::BANDS.len();
        let boundary = (self.max_height - self.min_height) / count as f32;
        let height = y - self.min_height;

        (1..=count)
            .find(|&i| height < boundary * i as f32)
            .map_or(count - 1, |i| i - 1)
    }
}

impl Texture for Rainbow {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        Self::BANDS[self.band(p.y)]
    }
}

/// Blocky value noise: a tint scaled by a random float picked through three
/// per-axis permutation tables.
pub struct Hashed {
    tint: Color,
    values: Vec<f32>,
    hash_x: Vec<usize>,
    hash_y: Vec<usize>,
    hash_z: Vec<usize>,
}

impl Hashed {
    pub fn new(tint: Color, rng: &mut dyn RngCore) -> Self {
        let values = (0..HASH_COUNT).map(|_| gen_f32(rng)).collect();
        Self {
            tint,
            values,
            hash_x: generate_perm(rng),
            hash_y: generate_perm(rng),
            hash_z: generate_perm(rng),
        }
    }
}

impl Texture for Hashed {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let i = ((4.0 * p.x) as i32 & 255) as usize;
        let j = ((4.0 * p.y) as i32 & 255) as usize;
        let k = ((4.0 * p.z) as i32 & 255) as usize;

        self.tint * self.values[self.hash_x[i] ^ self.hash_y[j] ^ self.hash_z[k]]
    }
}

/// Marble-like stripes along Z perturbed by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    tint: Color,
}

impl NoiseTexture {
    pub fn new(scale: f32, tint: Color, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            tint,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        self.tint * 0.5 * (1.0 + (self.scale * p.z + 10.0 * self.noise.turbulence(p, 7)).sin())
    }
}

/// Solid 3D checkerboard alternating between two textures.
pub struct Checker {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = (cell.x as i64)
            .wrapping_add(cell.y as i64)
            .wrapping_add(cell.z as i64);

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}
