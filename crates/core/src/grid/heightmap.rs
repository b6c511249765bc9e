//! Elevation grid shared by every raindrop of a run
//!
//! Samples are stored row-major (`y * width + x`), so `heightmap[y][x]`
//! addresses row `y`, column `x`. The same convention is used by the surface
//! normal estimator and the raindrop lookups.

use crate::core_types::NoiseConfig;
use crate::error::{ErosionError, MIN_GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Elevation mapped to gray level 0
pub const GRAY_MIN_ELEVATION: f64 = -1.0;
/// Elevation mapped to gray level 255
pub const GRAY_MAX_ELEVATION: f64 = 1.0;

/// Linear map of `value` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`
#[inline]
fn map_range(value: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    to_lo + ((to_hi - to_lo) / (from_hi - from_lo)) * (value - from_lo)
}

/// Two-dimensional elevation grid, conventionally in `[-1, 1]`
///
/// Values are unbounded once erosion has run; clamping happens only when the
/// grid is exported with [`Heightmap::to_gray`]. Deserialized grids go
/// through [`Heightmap::new`] and are rejected on the same conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeightmapData")]
pub struct Heightmap {
    /// Number of columns (X)
    width: usize,
    /// Number of rows (Y)
    height: usize,
    /// Elevations in row-major order (`y * width + x`)
    elevations: Vec<f64>,
}

/// Unchecked serialized form of [`Heightmap`]
#[derive(Deserialize)]
struct HeightmapData {
    width: usize,
    height: usize,
    elevations: Vec<f64>,
}

impl TryFrom<HeightmapData> for Heightmap {
    type Error = ErosionError;

    fn try_from(data: HeightmapData) -> Result<Self, Self::Error> {
        Heightmap::new(data.width, data.height, data.elevations)
    }
}

impl Heightmap {
    /// Create a heightmap from row-major samples
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::GridTooSmall`] if either side is below
    /// [`MIN_GRID_SIZE`], or [`ErosionError::DimensionMismatch`] if
    /// `elevations.len() != width * height`.
    pub fn new(width: usize, height: usize, elevations: Vec<f64>) -> Result<Self, ErosionError> {
        if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
            return Err(ErosionError::GridTooSmall { width, height });
        }
        if elevations.len() != width * height {
            return Err(ErosionError::DimensionMismatch {
                expected: width * height,
                found: elevations.len(),
            });
        }
        Ok(Self {
            width,
            height,
            elevations,
        })
    }

    /// Create a heightmap where every cell has the same elevation
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::GridTooSmall`] for sides below [`MIN_GRID_SIZE`].
    pub fn flat(width: usize, height: usize, elevation: f64) -> Result<Self, ErosionError> {
        Self::new(width, height, vec![elevation; width * height])
    }

    /// Create a linear ramp rising along X: `elevation = base + slope * x`
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::GridTooSmall`] for sides below [`MIN_GRID_SIZE`].
    pub fn ramp_x(width: usize, height: usize, base: f64, slope: f64) -> Result<Self, ErosionError> {
        let elevations = (0..height)
            .flat_map(|_| (0..width).map(move |x| base + slope * x as f64))
            .collect();
        Self::new(width, height, elevations)
    }

    /// Create a heightmap from fractal value noise, values in `[-1, 1]`
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::InvalidParameter`] if `noise` fails
    /// [`NoiseConfig::validate`], or [`ErosionError::GridTooSmall`] for sides
    /// below [`MIN_GRID_SIZE`].
    pub fn from_noise(width: usize, height: usize, noise: &NoiseConfig) -> Result<Self, ErosionError> {
        noise.validate()?;
        let mut elevations = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                elevations.push(noise.sample(x as f64, y as f64));
            }
        }
        Self::new(width, height, elevations)
    }

    /// Create a heightmap from `rows[y][x]`
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::GridTooSmall`] for fewer than [`MIN_GRID_SIZE`]
    /// rows or columns, and [`ErosionError::RaggedGrid`] if rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ErosionError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
            return Err(ErosionError::GridTooSmall { width, height });
        }

        let mut elevations = Vec::with_capacity(width * height);
        for (row, samples) in rows.into_iter().enumerate() {
            if samples.len() != width {
                return Err(ErosionError::RaggedGrid {
                    row,
                    expected: width,
                    found: samples.len(),
                });
            }
            elevations.extend(samples);
        }
        Self::new(width, height, elevations)
    }

    /// Create a heightmap from 8-bit gray pixels (row-major)
    ///
    /// Intensity `0..=255` maps linearly onto `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Same as [`Heightmap::new`].
    pub fn from_gray(width: usize, height: usize, pixels: &[u8]) -> Result<Self, ErosionError> {
        let elevations = pixels
            .iter()
            .map(|&p| {
                map_range(
                    f64::from(p),
                    0.0,
                    255.0,
                    GRAY_MIN_ELEVATION,
                    GRAY_MAX_ELEVATION,
                )
            })
            .collect();
        Self::new(width, height, elevations)
    }

    /// Export as 8-bit gray pixels (row-major)
    ///
    /// `[-1, 1]` maps linearly onto `0..=255`; values outside that range are
    /// clamped and the result is truncated to an integer.
    pub fn to_gray(&self) -> Vec<u8> {
        self.elevations
            .iter()
            .map(|&e| {
                map_range(e, GRAY_MIN_ELEVATION, GRAY_MAX_ELEVATION, 0.0, 255.0).clamp(0.0, 255.0)
                    as u8
            })
            .collect()
    }

    /// Copy out as `rows[y][x]`
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        y * self.width + x
    }

    /// Elevation at column `x`, row `y`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.elevations[self.offset(x, y)]
    }

    /// Set elevation at column `x`, row `y`
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.offset(x, y);
        self.elevations[i] = value;
    }

    /// Add `delta` to the elevation at column `x`, row `y`
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, delta: f64) {
        let i = self.offset(x, y);
        self.elevations[i] += delta;
    }

    /// Row-major view of all samples
    pub fn as_slice(&self) -> &[f64] {
        &self.elevations
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.elevations.chunks_exact(self.width)
    }

    /// Sum of all elevations
    pub fn total(&self) -> f64 {
        self.elevations.iter().sum()
    }

    /// Minimum and maximum elevation
    pub fn range(&self) -> (f64, f64) {
        self.elevations
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            })
    }
}

impl std::ops::Index<usize> for Heightmap {
    type Output = [f64];

    /// Row `y` as a slice, so `heightmap[y][x]` reads column `x`
    fn index(&self, y: usize) -> &[f64] {
        let start = y * self.width;
        &self.elevations[start..start + self.width]
    }
}
