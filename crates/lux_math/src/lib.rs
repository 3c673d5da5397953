//! Lux math primitives.
//!
//! Thin layer over `glam` with the value types the path tracer is built on:
//! closed real ranges, padded axis-aligned boxes and timed rays.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::{Aabb, MIN_THICKNESS};
pub use interval::Interval;
pub use ray::Ray;

/// Threshold below which a vector component counts as zero.
pub const NEAR_ZERO: f32 = 1e-8;

/// Returns true if every component of `v` is within [`NEAR_ZERO`] of zero.
///
/// Used to catch degenerate scatter directions before they reach the
/// intersection code.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO && v.y.abs() < NEAR_ZERO && v.z.abs() < NEAR_ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(Vec3::new(1e-9, 1e-3, 0.0)));
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
