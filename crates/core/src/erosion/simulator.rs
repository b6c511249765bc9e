//! Erosion engine: owns the heightmap and the raindrop generator
//!
//! Raindrops run strictly one after another. Each drop reads the grid left
//! behind by the previous one, so a run is reproducible from the seed, the
//! starting grid and the parameters alone.

use super::config::ErosionParams;
use super::droplet::{Raindrop, Termination, TraversalReport};
use crate::error::ErosionError;
use crate::grid::Heightmap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Raindrop counts for a batch or a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Raindrops simulated
    pub raindrops: u64,
    /// Steps taken across all raindrops
    pub steps: u64,
    /// Raindrops that ran out of volume
    pub evaporated: u64,
    /// Raindrops that left the grid interior
    pub out_of_bounds: u64,
}

impl SimulationStats {
    /// Count one finished traversal
    pub fn record(&mut self, report: &TraversalReport) {
        self.raindrops += 1;
        self.steps += report.steps;
        match report.termination {
            Termination::Evaporated => self.evaporated += 1,
            Termination::OutOfBounds => self.out_of_bounds += 1,
        }
    }

    /// Add another set of counts to this one
    pub fn merge(&mut self, other: &SimulationStats) {
        self.raindrops += other.raindrops;
        self.steps += other.steps;
        self.evaporated += other.evaporated;
        self.out_of_bounds += other.out_of_bounds;
    }

    /// Average traversal length, 0 when nothing ran
    pub fn mean_steps(&self) -> f64 {
        if self.raindrops == 0 {
            0.0
        } else {
            self.steps as f64 / self.raindrops as f64
        }
    }
}

/// Raindrop erosion over a single heightmap
///
/// # Example
///
/// ```
/// use rainfall_core::{ErosionEngine, ErosionParams, Heightmap, NoiseConfig};
///
/// let terrain = Heightmap::from_noise(64, 64, &NoiseConfig::default()).unwrap();
/// let mut engine = ErosionEngine::new(terrain, ErosionParams::for_width(64)).unwrap();
/// engine.simulate(100);
/// assert_eq!(engine.stats().raindrops, 100);
/// let eroded = engine.into_heightmap();
/// assert_eq!(eroded.width(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct ErosionEngine {
    heightmap: Heightmap,
    params: ErosionParams,
    rng: ChaCha8Rng,
    stats: SimulationStats,
}

impl ErosionEngine {
    /// Create an engine over `heightmap`
    ///
    /// The raindrop generator is seeded from `params.random_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::InvalidParameter`] if `params` fails
    /// [`ErosionParams::validate`].
    pub fn new(heightmap: Heightmap, params: ErosionParams) -> Result<Self, ErosionError> {
        params.validate()?;

        info!(
            "Erosion engine initialized: {}x{} grid, seed={}, max {} steps per raindrop",
            heightmap.width(),
            heightmap.height(),
            params.random_seed,
            params.max_steps()
        );

        Ok(Self {
            heightmap,
            params,
            rng: ChaCha8Rng::seed_from_u64(params.random_seed),
            stats: SimulationStats::default(),
        })
    }

    /// Create an engine from `rows[y][x]`
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Heightmap::from_rows`] and [`ErosionEngine::new`].
    pub fn from_rows(rows: Vec<Vec<f64>>, params: ErosionParams) -> Result<Self, ErosionError> {
        Self::new(Heightmap::from_rows(rows)?, params)
    }

    /// Drop a single raindrop at a random interior cell and run it to the end
    pub fn raindrop(&mut self) -> TraversalReport {
        let drop = Raindrop::spawn(
            &mut self.rng,
            self.heightmap.width(),
            self.heightmap.height(),
        );
        let start = drop.position();
        let report = drop.run(&mut self.heightmap, &self.params);

        trace!(
            "Raindrop from ({}, {}) {:?} after {} steps, sediment={:.4}",
            start.x,
            start.y,
            report.termination,
            report.steps,
            report.sediment
        );

        self.stats.record(&report);
        report
    }

    /// Run `count` raindrops in sequence
    ///
    /// Returns the counts for this batch only; [`ErosionEngine::stats`] keeps
    /// the running total.
    pub fn simulate(&mut self, count: usize) -> SimulationStats {
        let mut batch = SimulationStats::default();
        for _ in 0..count {
            let report = self.raindrop();
            batch.record(&report);
        }

        debug!(
            "Simulated {} raindrops: {} steps (mean {:.1}), {} evaporated, {} out of bounds",
            batch.raindrops,
            batch.steps,
            batch.mean_steps(),
            batch.evaporated,
            batch.out_of_bounds
        );

        batch
    }

    /// Current state of the grid
    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    /// Consume the engine and return the eroded grid
    pub fn into_heightmap(self) -> Heightmap {
        self.heightmap
    }

    pub fn params(&self) -> &ErosionParams {
        &self.params
    }

    /// Totals since the engine was created
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }
}
