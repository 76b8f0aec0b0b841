//! Error types for cloud fraction computation.

use thiserror::Error;

use crate::field::GridShape;

/// Errors that can occur while computing or reducing cloud fraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CloudFractionError {
    /// A field's data length does not match its declared shape.
    #[error("field has {len} values but shape {shape:?} needs {expected}")]
    InvalidLength {
        len: usize,
        shape: GridShape,
        expected: usize,
    },

    /// Two fields that must share a grid have different shapes.
    #[error("field '{field}' has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        field: &'static str,
        expected: GridShape,
        actual: GridShape,
    },

    /// The Ferrier scheme was selected without an ice-fraction field.
    #[error("microphysics scheme {scheme} needs an ice fraction field (F_ICE_PHY)")]
    MissingIceFraction { scheme: i32 },

    /// A saturation formula denominator is zero at this cell.
    #[error("saturation vapor pressure is singular at cell {index} (T = {temperature} K, P = {pressure} Pa)")]
    SaturationSingularity {
        index: usize,
        temperature: f64,
        pressure: f64,
    },

    /// No vertical level of a column lies inside the pressure band.
    #[error("no level in column (row {row}, col {col}) lies strictly between {low} and {high} hPa")]
    EmptyBand {
        row: usize,
        col: usize,
        low: f64,
        high: f64,
    },

    /// The pressure band bounds are unusable.
    #[error("invalid pressure band: {0}")]
    InvalidBand(String),
}

impl CloudFractionError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(field: &'static str, expected: GridShape, actual: GridShape) -> Self {
        Self::ShapeMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Create an InvalidBand error.
    pub fn invalid_band(msg: impl Into<String>) -> Self {
        Self::InvalidBand(msg.into())
    }
}

/// Result type for cloud fraction operations.
pub type Result<T> = std::result::Result<T, CloudFractionError>;
