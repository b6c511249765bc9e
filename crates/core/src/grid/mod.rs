//! Elevation grid

pub mod heightmap;

pub use heightmap::*;
