//! Vector type aliases for ground-plane and surface-normal math.
//!
//! Both aliases are plain `nalgebra` vectors, so the usual operators apply:
//! `+`/`+=` for component-wise addition, `component_mul` for component-wise
//! multiplication, `*`/`/` with an `f64` for scaling, `norm` for the Euclidean
//! length and `normalize_mut` for in-place normalization.
//!
//! `normalize_mut` divides by the length without checking it. Callers must
//! ensure the vector is non-zero; a zero vector comes out as NaN.

use nalgebra::{Vector2, Vector3};

/// 2D vector for positions, velocities and forces in the ground plane.
///
/// `x` follows grid columns and `y` follows grid rows.
pub type Vec2 = Vector2<f64>;

/// 3D vector in surface-normal space.
///
/// `y` is "up"; `x` and `z` line up with the grid's column and row axes.
pub type Vec3 = Vector3<f64>;

/// Project a surface normal onto the ground plane as `(x, z)`.
#[inline]
pub fn horizontal(normal: &Vec3) -> Vec2 {
    Vec2::new(normal.x, normal.z)
}
