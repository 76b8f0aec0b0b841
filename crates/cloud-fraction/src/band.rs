//! Column maximum over a pressure band.
//!
//! For every horizontal column, select the levels whose pressure lies
//! strictly inside `(low, high)` hPa and keep the largest value of the field
//! among them. Levels outside the band never affect the result.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CloudFractionError, Result};
use crate::field::{Field2D, Field3D};

/// Open pressure interval in hPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureBand {
    /// Lower bound (exclusive).
    pub low: f64,
    /// Upper bound (exclusive).
    pub high: f64,
}

impl Default for PressureBand {
    fn default() -> Self {
        Self {
            low: 350.0,
            high: 400.0,
        }
    }
}

impl PressureBand {
    /// Create a band, rejecting non-finite or inverted bounds.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let band = Self { low, high };
        band.validate()?;
        Ok(band)
    }

    /// Validate the bounds.
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(CloudFractionError::invalid_band(format!(
                "bounds must be finite, got ({}, {})",
                self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(CloudFractionError::invalid_band(format!(
                "low bound {} must be below high bound {}",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Whether `pressure_hpa` lies strictly inside the band.
    #[inline]
    pub fn contains(&self, pressure_hpa: f64) -> bool {
        self.low < pressure_hpa && pressure_hpa < self.high
    }
}

/// What to report for a column with no level inside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyBandPolicy {
    /// Fail with [`CloudFractionError::EmptyBand`] naming the first such
    /// column in row-major order.
    #[default]
    Fail,
    /// Emit NaN for the column.
    Nan,
    /// Emit 0 (clear sky) for the column.
    Zero,
}

impl EmptyBandPolicy {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" | "error" => Some(Self::Fail),
            "nan" => Some(Self::Nan),
            "zero" | "0" => Some(Self::Zero),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Nan => "nan",
            Self::Zero => "zero",
        }
    }
}

impl std::fmt::Display for EmptyBandPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maximum of `field` over the in-band levels of each column.
///
/// `pressure_hpa` must have the same shape as `field`. Columns without any
/// in-band level are handled according to `policy`.
pub fn band_max(
    field: &Field3D,
    pressure_hpa: &Field3D,
    band: PressureBand,
    policy: EmptyBandPolicy,
) -> Result<Field2D> {
    band.validate()?;

    let shape = field.shape();
    if pressure_hpa.shape() != shape {
        return Err(CloudFractionError::shape_mismatch(
            "pressure_hpa",
            shape,
            pressure_hpa.shape(),
        ));
    }

    let maxima: Vec<Option<f64>> = (0..shape.columns())
        .into_par_iter()
        .map(|column| {
            column_band_max(field, pressure_hpa, band, column / shape.nx, column % shape.nx)
        })
        .collect();

    let data = match policy {
        EmptyBandPolicy::Fail => {
            if let Some(column) = maxima.iter().position(Option::is_none) {
                return Err(CloudFractionError::EmptyBand {
                    row: column / shape.nx,
                    col: column % shape.nx,
                    low: band.low,
                    high: band.high,
                });
            }
            maxima.into_iter().flatten().collect()
        }
        EmptyBandPolicy::Nan => maxima.into_iter().map(|m| m.unwrap_or(f64::NAN)).collect(),
        EmptyBandPolicy::Zero => maxima.into_iter().map(|m| m.unwrap_or(0.0)).collect(),
    };

    Ok(Field2D::from_parts(data, shape.ny, shape.nx))
}

/// Max over the in-band levels of one column, `None` if no level is in band.
#[inline]
fn column_band_max(
    field: &Field3D,
    pressure_hpa: &Field3D,
    band: PressureBand,
    j: usize,
    i: usize,
) -> Option<f64> {
    field
        .column(j, i)
        .zip(pressure_hpa.column(j, i))
        .filter(|&(_, p)| band.contains(p))
        .map(|(value, _)| value)
        .reduce(f64::max)
}
