//! Value noise for synthesizing initial heightmaps
//!
//! Provides deterministic pseudo-random noise so a run can start from a
//! reproducible terrain without an input image:
//! - Single-octave lattice value noise with smoothstep interpolation
//! - Fractal Brownian motion (fBm) summing several octaves
//!
//! All functions are pure; the same coordinates and seed always give the
//! same value on every platform.

use crate::error::ErosionError;
use serde::{Deserialize, Serialize};

/// Lattice hashing primes
const SEED_X: i32 = 1619;
const SEED_Y: i32 = 31337;

/// Maximum value for positive i32 as f64 for safe conversion
const MAX_I32_POSITIVE: f64 = 0x7fff_ffff as f64;

/// Integer hash of a lattice point. Returns a value in [0, 1].
#[inline]
fn hash_2d(x: i32, y: i32, seed: u32) -> f64 {
    let mut n = x
        .wrapping_mul(SEED_X)
        .wrapping_add(y.wrapping_mul(SEED_Y))
        .wrapping_add(seed as i32);
    n = (n << 13) ^ n;
    n = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589);
    f64::from(n & 0x7fff_ffff) / MAX_I32_POSITIVE
}

/// Smooth interpolation function (Hermite curve)
#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise in [-1, 1]
///
/// # Parameters
/// - `x`, `y`: Grid coordinates (cells)
/// - `scale`: Lattice spacing in cells (larger = smoother terrain)
/// - `seed`: Seed for different noise layers
pub fn value_noise_2d(x: f64, y: f64, scale: f64, seed: u32) -> f64 {
    let sx = x / scale;
    let sy = y / scale;

    let x0 = sx.floor() as i32;
    let y0 = sy.floor() as i32;
    // Saturated casts sit at i32::MAX for very large coordinates
    let x1 = x0.wrapping_add(1);
    let y1 = y0.wrapping_add(1);

    let fx = smoothstep(sx - sx.floor());
    let fy = smoothstep(sy - sy.floor());

    let v00 = hash_2d(x0, y0, seed);
    let v10 = hash_2d(x1, y0, seed);
    let v01 = hash_2d(x0, y1, seed);
    let v11 = hash_2d(x1, y1, seed);

    // Bilinear interpolation
    let v0 = v00 + fx * (v10 - v00);
    let v1 = v01 + fx * (v11 - v01);
    let v = v0 + fy * (v1 - v0);

    v * 2.0 - 1.0
}

/// Fractal Brownian Motion (fBm) in [-1, 1]
///
/// Each octave doubles the frequency, scales the amplitude by `persistence`
/// and uses its own seed so layers do not line up.
pub fn fbm_2d(x: f64, y: f64, scale: f64, octaves: u32, persistence: f64, seed: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for i in 0..octaves {
        total += value_noise_2d(x * frequency, y * frequency, scale, seed.wrapping_add(i)) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

/// Settings for noise-generated terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Lattice spacing of the first octave in cells
    pub scale: f64,
    /// Number of noise layers (4-6 typical for terrain)
    pub octaves: u32,
    /// Amplitude reduction per octave (0.5 typical)
    pub persistence: f64,
    /// Base seed
    pub seed: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 64.0,
            octaves: 5,
            persistence: 0.5,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    /// Check the settings produce usable terrain
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::InvalidParameter`] if `scale` is not a finite
    /// positive number or `persistence` is not finite.
    pub fn validate(&self) -> Result<(), ErosionError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ErosionError::invalid(
                "noise.scale",
                self.scale,
                "must be finite and positive",
            ));
        }
        if !self.persistence.is_finite() {
            return Err(ErosionError::invalid(
                "noise.persistence",
                self.persistence,
                "must be finite",
            ));
        }
        Ok(())
    }

    /// Sample the configured fBm at a grid cell
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        fbm_2d(x, y, self.scale, self.octaves, self.persistence, self.seed)
    }
}
