//! Erosion parameters

use crate::error::ErosionError;
use serde::{Deserialize, Serialize};

/// Parameters for a raindrop erosion run. Immutable once the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErosionParams {
    /// Multiplier applied to elevation differences when estimating the
    /// surface normal. Larger values push raindrops harder and further.
    pub scale: f64,
    /// Mass per unit volume. Acceleration is `force / (volume * density)`,
    /// so denser drops accelerate more slowly.
    pub density: f64,
    /// Fraction of velocity lost after every move (0-1)
    pub friction: f64,
    /// Fraction of the sediment imbalance applied per step
    pub deposition_rate: f64,
    /// Volume lost per step. Bounds a drop's lifetime to
    /// `ceil(1 / evaporation_rate)` steps; typically `1 / width`.
    pub evaporation_rate: f64,
    /// Seed for raindrop placement
    pub random_seed: u64,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            scale: 100.0,
            density: 1.0,
            friction: 0.1,
            deposition_rate: 0.3,
            evaporation_rate: 1.0 / 512.0,
            random_seed: 1923,
        }
    }
}

impl ErosionParams {
    /// Default parameters with `evaporation_rate = 1 / width`
    pub fn for_width(width: usize) -> Self {
        Self {
            evaporation_rate: 1.0 / width.max(1) as f64,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_deposition_rate(mut self, deposition_rate: f64) -> Self {
        self.deposition_rate = deposition_rate;
        self
    }

    pub fn with_evaporation_rate(mut self, evaporation_rate: f64) -> Self {
        self.evaporation_rate = evaporation_rate;
        self
    }

    pub fn with_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    /// Steps a raindrop takes before evaporating if it never leaves the grid
    ///
    /// Counted by the same repeated `volume -= evaporation_rate` a raindrop
    /// performs, so rounding is included: a rate of `1/3` leaves a sliver of
    /// volume after three steps and evaporates on the fourth. Returns
    /// `u64::MAX` for a rate that never reduces a full volume.
    pub fn max_steps(&self) -> u64 {
        if !self.reduces_full_volume() {
            return u64::MAX;
        }
        let mut volume = 1.0;
        let mut steps = 0;
        while volume > 0.0 {
            volume -= self.evaporation_rate;
            steps += 1;
        }
        steps
    }

    /// `1.0 - evaporation_rate` is strictly below 1.0
    fn reduces_full_volume(&self) -> bool {
        1.0 - self.evaporation_rate < 1.0
    }

    /// Check every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns [`ErosionError::InvalidParameter`] when:
    /// - any value is NaN or infinite
    /// - `density` is zero (acceleration would divide by zero)
    /// - `friction` is outside `[0, 1)`
    /// - `evaporation_rate` is not positive, or too small to change a volume
    ///   of 1.0 (drops would never terminate)
    pub fn validate(&self) -> Result<(), ErosionError> {
        let fields = [
            ("scale", self.scale),
            ("density", self.density),
            ("friction", self.friction),
            ("deposition_rate", self.deposition_rate),
            ("evaporation_rate", self.evaporation_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ErosionError::invalid(name, value, "must be finite"));
            }
        }

        if self.density == 0.0 {
            return Err(ErosionError::invalid(
                "density",
                self.density,
                "must be non-zero",
            ));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ErosionError::invalid(
                "friction",
                self.friction,
                "must be in [0, 1)",
            ));
        }
        if self.evaporation_rate <= 0.0 {
            return Err(ErosionError::invalid(
                "evaporation_rate",
                self.evaporation_rate,
                "must be positive",
            ));
        }
        if !self.reduces_full_volume() {
            return Err(ErosionError::invalid(
                "evaporation_rate",
                self.evaporation_rate,
                "too small to reduce a full volume",
            ));
        }
        Ok(())
    }
}
