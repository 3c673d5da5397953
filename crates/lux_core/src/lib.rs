//! Lux Core - inputs consumed by the path tracer.
//!
//! This crate provides:
//!
//! - **Decoded images**: `ImageData`, a byte RGB buffer with clamped
//!   nearest-pixel lookup, and `ImageCache` for sharing decoded files
//! - **Meshes**: `Mesh`, a flat list of face vertices with per-face vertex
//!   counts, loadable from Wavefront OBJ
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{ImageData, Mesh};
//!
//! let earth = ImageData::load_or_empty("textures/earth.jpg");
//! let meshes = Mesh::load_obj("models/teapot.obj")?;
//! println!("{}x{} texture, {} meshes", earth.width(), earth.height(), meshes.len());
//! ```

pub mod image_data;
pub mod mesh;

// Re-export commonly used types
pub use image_data::{ImageCache, ImageData, ImageError, ImageResult};
pub use mesh::{Mesh, MeshError, MeshResult};
