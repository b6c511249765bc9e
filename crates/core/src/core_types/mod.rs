//! Core types and utilities

pub mod noise;
pub mod vector;

pub use noise::NoiseConfig;
pub use vector::{horizontal, Vec2, Vec3};
