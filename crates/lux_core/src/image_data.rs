//! Decoded image buffers for image-backed textures.
//!
//! Images are decoded once, linearized and stored as 8-bit RGB so texture
//! lookups are a clamped index into a flat byte array.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Bytes per stored pixel (RGB).
const BYTES_PER_PIXEL: usize = 3;

/// Returned for lookups into an image that failed to load.
const MISSING_PIXEL: [u8; 3] = [255, 0, 255];

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image {0} has no pixels")]
    Empty(String),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A decoded image with linear 8-bit RGB pixels, row-major, top row first.
///
/// A zero-sized `ImageData` is the placeholder for an image that could not
/// be decoded; consumers check [`ImageData::is_empty`] and substitute a
/// diagnostic colour.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap an existing RGB byte buffer.
    pub fn from_rgb8(width: u32, height: u32, bytes: Vec<u8>) -> ImageResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if bytes.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// The zero-sized placeholder.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode an image file.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| ImageError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty(path.display().to_string()));
        }

        let bytes = rgb
            .as_raw()
            .iter()
            .map(|&b| float_to_byte(srgb_to_linear(b)))
            .collect();

        log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Decode an image file, falling back to the empty placeholder.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not load image file: {}", e);
                Self::empty()
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for the placeholder produced by a failed decode.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes of the pixel at (x, y), with coordinates clamped to the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        if self.is_empty() {
            return MISSING_PIXEL;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;

        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }
}

/// Cache of decoded images keyed by path.
///
/// Failed decodes are cached too, as the empty placeholder, so a missing
/// file is only reported once.
pub struct ImageCache {
    images: HashMap<PathBuf, Arc<ImageData>>,
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    /// Create a new empty image cache.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, reusing a previous decode of the same path.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Arc<ImageData> {
        let full_path = self.resolve_path(path.as_ref());

        self.images
            .entry(full_path)
            .or_insert_with_key(|p| Arc::new(ImageData::load_or_empty(p)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}
