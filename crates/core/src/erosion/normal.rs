//! Surface normal estimation from the 8-cell neighbourhood
//!
//! A weighted finite-difference estimator rather than a true geometric
//! normal. Each axis neighbour contributes `0.15 * (s*dh, 1, 0)` (or the Z
//! equivalent) and each diagonal contributes `0.10 * (s*dh/√2, √2, s*dh/√2)`,
//! where `dh` is the drop in elevation towards that neighbour and `s` is the
//! scale parameter. The weights and summation order are fixed; changing
//! them changes every eroded terrain.

use crate::core_types::Vec3;
use crate::grid::Heightmap;
use std::f64::consts::SQRT_2;

/// Weight of each axis-aligned neighbour term
const AXIS_WEIGHT: f64 = 0.15;
/// Weight of each diagonal neighbour term
const DIAGONAL_WEIGHT: f64 = 0.1;

/// Diagonal neighbours as `(dx, dy)`, in summation order
const DIAGONALS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Unit surface normal at column `x`, row `y`
///
/// `x` and `z` of the result point downhill along the grid's X and Y axes;
/// `y` is the vertical component.
///
/// Callers must keep a one-cell margin: `1 <= x <= width - 2` and
/// `1 <= y <= height - 2`. Out-of-range coordinates panic.
pub fn surface_normal(heightmap: &Heightmap, scale: f64, x: usize, y: usize) -> Vec3 {
    debug_assert!(
        x >= 1 && x + 1 < heightmap.width() && y >= 1 && y + 1 < heightmap.height(),
        "surface normal needs a one-cell margin, got ({x}, {y})"
    );

    let h = |dx: isize, dy: isize| {
        heightmap.get(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy))
    };
    let center = h(0, 0);

    // 4 axis-aligned neighbours
    let mut normal = Vec3::new(scale * (center - h(1, 0)), 1.0, 0.0) * AXIS_WEIGHT;
    normal += Vec3::new(scale * (h(-1, 0) - center), 1.0, 0.0) * AXIS_WEIGHT;
    normal += Vec3::new(0.0, 1.0, scale * (center - h(0, 1))) * AXIS_WEIGHT;
    normal += Vec3::new(0.0, 1.0, scale * (h(0, -1) - center)) * AXIS_WEIGHT;

    // 4 diagonal neighbours
    for (dx, dy) in DIAGONALS {
        let run = scale * (center - h(dx, dy)) / SQRT_2;
        normal += Vec3::new(run, SQRT_2, run) * DIAGONAL_WEIGHT;
    }

    normal.normalize_mut();
    normal
}
