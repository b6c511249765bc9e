//! Raindrop state and per-step transport physics
//!
//! A raindrop is alive until its volume runs out or it leaves the interior of
//! the grid. Every step it:
//! 1. accelerates along the surface normal of the cell it sits on
//!    (`force / (volume * density)`)
//! 2. moves by its velocity, then loses `friction` of that velocity
//! 3. terminates if it left `[1, size - 1)` on either axis
//! 4. otherwise compares its sediment capacity
//!    `volume * speed * (h(origin) - h(destination))` (never below zero)
//!    with the sediment it carries, picks up or drops `deposition_rate` of
//!    the difference, and writes the matching change to the origin cell
//! 5. evaporates `evaporation_rate` of volume
//!
//! Only the origin cell is written each step. The destination is left alone.

use super::config::ErosionParams;
use super::normal::surface_normal;
use crate::core_types::{horizontal, Vec2};
use crate::grid::Heightmap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Why a raindrop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Volume reached zero
    Evaporated,
    /// Position left the interior of the grid
    OutOfBounds,
}

/// Result of a single [`Raindrop::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Still alive after the step
    Moved,
    /// The drop is terminated and will not move again
    Terminated(Termination),
}

/// Summary of one complete raindrop traversal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraversalReport {
    /// Steps taken, including the one that terminated the drop
    pub steps: u64,
    pub termination: Termination,
    /// Volume left at termination (<= 0 when evaporated)
    pub volume: f64,
    /// Sediment carried at termination
    pub sediment: f64,
}

/// A single raindrop particle
#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    position: Vec2,
    velocity: Vec2,
    volume: f64,
    sediment: f64,
    steps: u64,
    terminated: Option<Termination>,
}

impl Raindrop {
    /// Place a fresh raindrop at cell `(x, y)`
    ///
    /// Any cell is accepted. A drop placed outside the grid interior (on the
    /// border or beyond the grid) terminates as [`Termination::OutOfBounds`]
    /// on its first step without taking it.
    pub fn at(x: usize, y: usize) -> Self {
        Self {
            position: Vec2::new(x as f64, y as f64),
            velocity: Vec2::zeros(),
            volume: 1.0,
            sediment: 0.0,
            steps: 0,
            terminated: None,
        }
    }

    /// Place a fresh raindrop on a random interior cell of a
    /// `width x height` grid. X is drawn before Y.
    ///
    /// # Panics
    ///
    /// Panics if either side is below 3, since such a grid has no interior
    /// cell. Every [`Heightmap`] satisfies this.
    pub fn spawn<R: Rng>(rng: &mut R, width: usize, height: usize) -> Self {
        let x = rng.random_range(1..=width - 2);
        let y = rng.random_range(1..=height - 2);
        Self::at(x, y)
    }

    /// Continuous position `(x, y)` in cells
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Remaining volume, starts at 1.0
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Sediment currently carried
    pub fn sediment(&self) -> f64 {
        self.sediment
    }

    /// Steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `None` while the drop is alive
    pub fn termination(&self) -> Option<Termination> {
        self.terminated
    }

    pub fn is_alive(&self) -> bool {
        self.terminated.is_none()
    }

    /// Grid cell containing `position`
    #[inline]
    fn cell(position: Vec2) -> (usize, usize) {
        (position.x as usize, position.y as usize)
    }

    /// `position` is inside `[1, width - 1) x [1, height - 1)`.
    /// NaN coordinates count as outside.
    #[inline]
    fn in_interior(position: Vec2, heightmap: &Heightmap) -> bool {
        let max_x = (heightmap.width() - 1) as f64;
        let max_y = (heightmap.height() - 1) as f64;
        (1.0..max_x).contains(&position.x) && (1.0..max_y).contains(&position.y)
    }

    /// Advance the drop by one step, eroding or depositing on `heightmap`
    ///
    /// Stepping a terminated drop does nothing and reports the same
    /// termination again.
    pub fn step(&mut self, heightmap: &mut Heightmap, params: &ErosionParams) -> StepOutcome {
        if let Some(termination) = self.terminated {
            return StepOutcome::Terminated(termination);
        }
        // Only a drop placed with `at` can start outside the interior
        if !Self::in_interior(self.position, heightmap) {
            return self.terminate(Termination::OutOfBounds);
        }
        self.steps += 1;

        let (ox, oy) = Self::cell(self.position);
        let normal = surface_normal(heightmap, params.scale, ox, oy);

        // acceleration = force / mass
        let acceleration = horizontal(&normal) / (self.volume * params.density);
        self.velocity += acceleration;
        self.position += self.velocity;
        self.velocity *= 1.0 - params.friction;

        if !Self::in_interior(self.position, heightmap) {
            return self.terminate(Termination::OutOfBounds);
        }

        // Positive difference erodes, negative deposits
        let (nx, ny) = Self::cell(self.position);
        let capacity = (self.volume * self.velocity.norm()
            * (heightmap.get(ox, oy) - heightmap.get(nx, ny)))
        .max(0.0);
        let difference = capacity - self.sediment;

        self.sediment += params.deposition_rate * difference;
        heightmap.add(
            ox,
            oy,
            -(self.volume * params.deposition_rate * difference),
        );

        self.volume -= params.evaporation_rate;
        if self.volume > 0.0 {
            StepOutcome::Moved
        } else {
            self.terminate(Termination::Evaporated)
        }
    }

    fn terminate(&mut self, termination: Termination) -> StepOutcome {
        self.terminated = Some(termination);
        StepOutcome::Terminated(termination)
    }

    /// Step until the drop terminates
    pub fn run(mut self, heightmap: &mut Heightmap, params: &ErosionParams) -> TraversalReport {
        let termination = loop {
            if let StepOutcome::Terminated(termination) = self.step(heightmap, params) {
                break termination;
            }
        };
        TraversalReport {
            steps: self.steps,
            termination,
            volume: self.volume,
            sediment: self.sediment,
        }
    }
}
