//! Lattice gradient noise.

use crate::sampling::{gen_index, random_vec3};
use lux_math::Vec3;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Perlin noise generator with random unit gradients on an integer lattice.
///
/// The tables are drawn once at construction; lookups are pure.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| random_vec3(rng, -1.0, 1.0).normalize_or_zero())
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1]. Zero at lattice points.
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[lattice(i, di)]
                        ^ self.perm_y[lattice(j, dj)]
                        ^ self.perm_z[lattice(k, dk)];
                    *corner = self.gradients[idx];
                }
            }
        }

        interpolate(&c, u, v, w)
    }

    /// Sum of `depth` octaves with halving weight and doubling frequency.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn lattice(base: i32, offset: usize) -> usize {
    (base.wrapping_add(offset as i32) & 255) as usize
}

/// Identity permutation of 0..256 shuffled with Fisher-Yates.
pub(crate) fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = gen_index(rng, i);
        p.swap(i, target);
    }
    p
}

/// Hermite-smoothed trilinear interpolation of the corner gradients.
fn interpolate(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight_v = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_perm_is_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut perm = generate_perm(&mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..POINT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_noise_zero_at_lattice_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let perlin = Perlin::new(&mut rng);

        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-10.0, 4.0, 1.0)] {
            assert!(perlin.noise(p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_bounded_and_turbulence_non_negative() {
        let mut rng = StdRng::seed_from_u64(12);
        let perlin = Perlin::new(&mut rng);

        for _ in 0..500 {
            let p = random_vec3(&mut rng, -20.0, 20.0);
            let n = perlin.noise(p);
            assert!(n.is_finite() && n.abs() <= 2.0);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
    }

    #[test]
    fn test_noise_is_deterministic_per_table() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(13));
        let p = Vec3::new(1.3, 2.7, -0.4);
        assert_eq!(perlin.noise(p), perlin.noise(p));
        assert_eq!(perlin.turbulence(p, 0), 0.0);
    }

    #[test]
    fn test_noise_far_from_origin() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(14));

        // Coordinates past i32 range saturate when floored
        for p in [Vec3::new(4.0e7, 1.0, 1.0), Vec3::splat(-3.0e9), Vec3::new(1.0, 1.0e20, 0.5)] {
            assert!(perlin.noise(p).is_finite());
            assert!(perlin.turbulence(p, 7).is_finite());
        }
    }
}
