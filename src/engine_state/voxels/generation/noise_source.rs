//! Coherent noise used by terrain generation.

use noise::{NoiseFn, Perlin};

/// Frequency applied to every coordinate before sampling.
///
/// Generation code multiplies world coordinates by per-feature factors (4 for hills,
/// 64 for the bedrock floor, ...); this constant turns those into lattice units.
pub const BASE_FREQUENCY: f64 = 0.01;

/// A deterministic 2D/3D coherent-noise function.
///
/// Implementations must be pure: the same coordinates always give the same value, and
/// values stay within `[-1, 1]`.
pub trait NoiseSource: Send + Sync {
    fn sample_2d(&self, x: f64, y: f64) -> f64;
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Perlin noise seeded with the world seed.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: i32) -> Self {
        PerlinNoise {
            perlin: Perlin::new(seed as u32),
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.perlin
            .get([x * BASE_FREQUENCY, y * BASE_FREQUENCY])
            .clamp(-1.0, 1.0)
    }

    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin
            .get([x * BASE_FREQUENCY, y * BASE_FREQUENCY, z * BASE_FREQUENCY])
            .clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_deterministic_and_bounded() {
        let a = PerlinNoise::new(1234);
        let b = PerlinNoise::new(1234);
        for i in 0..200 {
            let x = i as f64 * 3.7 - 150.0;
            let z = i as f64 * -1.3 + 40.0;
            assert_eq!(a.sample_2d(x, z), b.sample_2d(x, z));
            let v = a.sample_3d(x, i as f64, z);
            assert!((-1.0..=1.0).contains(&v));
        }
    }
}
