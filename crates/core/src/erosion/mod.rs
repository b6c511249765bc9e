//! Raindrop hydraulic erosion
//!
//! Particles are dropped one at a time onto the heightmap, slide downhill
//! along the estimated surface normal and carve or fill the cells they leave.

mod config;
pub mod droplet;
pub mod normal;
mod simulator;

pub use config::ErosionParams;
pub use droplet::{Raindrop, StepOutcome, Termination, TraversalReport};
pub use normal::surface_normal;
pub use simulator::{ErosionEngine, SimulationStats};
