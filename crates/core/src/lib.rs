//! Raindrop Erosion Core Library
//!
//! Simulates hydraulic erosion on a heightmap by dropping discrete raindrop
//! particles that flow downhill across the grid, picking up sediment where
//! they speed down slopes and dropping it where they slow.
//!
//! ## Overview
//!
//! - [`Heightmap`]: row-major elevation grid, conventionally in `[-1, 1]`
//! - [`ErosionParams`]: scale, density, friction, deposition, evaporation, seed
//! - [`ErosionEngine`]: owns the grid and a seeded generator; `simulate(n)`
//!   runs `n` raindrops in sequence
//!
//! Runs are deterministic: the same grid, parameters and seed give
//! bit-identical output.

// Core types and utilities
pub mod core_types;

pub mod erosion;
pub mod error;
pub mod grid;

// Re-export core types
pub use core_types::{NoiseConfig, Vec2, Vec3};
pub use erosion::{
    ErosionEngine, ErosionParams, Raindrop, SimulationStats, StepOutcome, Termination,
    TraversalReport,
};
pub use error::ErosionError;
pub use grid::Heightmap;
