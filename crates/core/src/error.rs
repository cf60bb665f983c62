//! Error types for grid construction and configuration
//!
//! Only construction and configuration can fail. Once a simulation exists,
//! stepping and querying it are infallible.

use std::fmt;

/// Errors returned when a grid, raster or configuration is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Grid width or height is zero, or the cell count does not fit a cell id
    InvalidDimensions { width: usize, height: usize },
    /// A probability is non-finite or outside `[0, 1]`
    InvalidProbability { name: &'static str, value: f32 },
    /// Any other out-of-range parameter
    InvalidParameter { name: &'static str, message: String },
    /// Raster data length does not match its declared dimensions
    RasterSizeMismatch { expected: usize, actual: usize },
    /// The wind table has no entry for a direction
    EmptyWindTable(String),
    /// Reading or writing a configuration file failed
    ConfigIo(String),
    /// A configuration document could not be parsed or serialized
    ConfigParse(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "Invalid grid dimensions {width}x{height}")
            }
            GridError::InvalidProbability { name, value } => {
                write!(f, "Probability '{name}' must be within [0, 1], got {value}")
            }
            GridError::InvalidParameter { name, message } => {
                write!(f, "Parameter '{name}': {message}")
            }
            GridError::RasterSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Raster size mismatch: expected {expected} bytes, got {actual}"
                )
            }
            GridError::EmptyWindTable(direction) => {
                write!(f, "Wind offset table has no entry for {direction}")
            }
            GridError::ConfigIo(msg) => write!(f, "Failed to access config: {msg}"),
            GridError::ConfigParse(msg) => write!(f, "Failed to parse config: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}

/// A terrain input that was rejected during initialization
///
/// The simulation still starts: heights fall back to 0 and materials to the
/// configured policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitWarning {
    /// Heightmap missing, unreadable or malformed
    HeightmapUnavailable(String),
    /// Landscape raster missing, unreadable or malformed
    LandscapeUnavailable(String),
}

impl fmt::Display for InitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitWarning::HeightmapUnavailable(reason) => {
                write!(f, "Heightmap ignored, using flat terrain: {reason}")
            }
            InitWarning::LandscapeUnavailable(reason) => {
                write!(f, "Landscape ignored, using material policy: {reason}")
            }
        }
    }
}

/// Validate that `value` is a finite probability
///
/// # Errors
/// Returns `GridError::InvalidProbability` when `value` is NaN, infinite or outside `[0, 1]`
pub(crate) fn check_probability(name: &'static str, value: f32) -> Result<(), GridError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GridError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", -0.1).is_err());
        assert!(check_probability("p", f32::NAN).is_err());
    }

    #[test]
    fn test_display_messages() {
        let err = GridError::InvalidDimensions {
            width: 0,
            height: 4,
        };
        assert_eq!(err.to_string(), "Invalid grid dimensions 0x4");

        let err = GridError::RasterSizeMismatch {
            expected: 12,
            actual: 9,
        };
        assert!(err.to_string().contains("expected 12"));

        let warning = InitWarning::HeightmapUnavailable("no such file".to_string());
        assert!(warning.to_string().contains("flat terrain"));
    }
}
