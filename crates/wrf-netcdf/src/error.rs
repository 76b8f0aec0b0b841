//! Error types for WRF NetCDF access.

use cloud_fraction::CloudFractionError;
use thiserror::Error;

/// Result type for WRF NetCDF operations.
pub type WrfResult<T> = Result<T, WrfNetCdfError>;

/// Error types for reading and writing WRF output.
#[derive(Error, Debug)]
pub enum WrfNetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by the NetCDF library
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Missing or unreadable global attribute
    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    /// Variable dimensions do not match the model grid
    #[error("invalid shape for '{name}': {detail}")]
    InvalidShape { name: String, detail: String },

    /// Requested time record does not exist
    #[error("time index {index} out of range (file has {count} records)")]
    TimeOutOfRange { index: usize, count: usize },

    /// Output variable already present and overwrite not requested
    #[error("variable '{0}' already exists (use overwrite to replace it)")]
    AlreadyExists(String),

    /// Field construction or derivation failed
    #[error(transparent)]
    Field(#[from] CloudFractionError),
}

impl WrfNetCdfError {
    /// Create an InvalidShape error.
    pub fn invalid_shape(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidShape {
            name: name.into(),
            detail: detail.into(),
        }
    }
}
