//! Errors raised when building a heightmap or an erosion engine

/// Smallest accepted grid side. Raindrops need a one-cell border around
/// at least one interior cell.
pub const MIN_GRID_SIZE: usize = 3;

/// Errors that can occur when validating inputs to the erosion engine
#[derive(Debug, Clone, PartialEq)]
pub enum ErosionError {
    /// Grid is narrower or shorter than [`MIN_GRID_SIZE`]
    GridTooSmall { width: usize, height: usize },
    /// A row does not have the same length as the first row
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Flat sample buffer does not match `width * height`
    DimensionMismatch { expected: usize, found: usize },
    /// A simulation parameter is outside its accepted range
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ErosionError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ErosionError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

impl std::fmt::Display for ErosionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErosionError::GridTooSmall { width, height } => write!(
                f,
                "Grid of {width}x{height} is too small: both sides must be at least {MIN_GRID_SIZE}"
            ),
            ErosionError::RaggedGrid {
                row,
                expected,
                found,
            } => write!(f, "Row {row} has {found} samples, expected {expected}"),
            ErosionError::DimensionMismatch { expected, found } => {
                write!(f, "Expected {expected} samples, found {found}")
            }
            ErosionError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "Parameter '{name}' = {value}: {reason}"),
        }
    }
}

impl std::error::Error for ErosionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ErosionError::GridTooSmall {
            width: 2,
            height: 8,
        };
        assert_eq!(
            err.to_string(),
            "Grid of 2x8 is too small: both sides must be at least 3"
        );

        let err = ErosionError::invalid("density", 0.0, "must be non-zero");
        assert_eq!(err.to_string(), "Parameter 'density' = 0: must be non-zero");
    }
}
