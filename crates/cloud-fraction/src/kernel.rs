//! Grid-scale cloud cover for radiation.
//!
//! Cloud fraction follows Xu and Randall (1996) as modified by Ferrier (2002)
//! for the WRF GFDL/Eta radiation scheme. Grid-scale saturation is assumed at
//! `RH = rh_grid`:
//!
//! ```text
//! QCLD < qcld_min            -> 0
//! RH > rh_grid               -> 1
//! otherwise                  -> (RH / rh_grid)^pexp * (1 - exp(ARG))
//!     ARG = max(arg_floor, -alpha0 * QCLD / max(subsat_floor, rh_grid*QVS - Qv)^gamma)
//! ```
//!
//! Fractions under `min_fraction` are reported as clear sky.

use rayon::prelude::*;
use tracing::debug;

use crate::constants::CloudConstants;
use crate::error::{CloudFractionError, Result};
use crate::field::{Field3D, ModelFields};
use crate::saturation::SaturationMixingRatio;
use crate::scheme::MicrophysicsScheme;

/// Inputs of the cloud fraction kernel at a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    /// Temperature (K).
    pub temperature: f64,
    /// Full pressure (Pa).
    pub pressure: f64,
    /// Water vapor mixing ratio (kg/kg).
    pub qvapor: f64,
    /// Cloud water mixing ratio (kg/kg).
    pub qcloud: f64,
    /// Rain mixing ratio (kg/kg). Never counted as cloud.
    pub qrain: f64,
    /// Cloud ice mixing ratio (kg/kg).
    pub qice: f64,
    /// Snow mixing ratio (kg/kg).
    pub qsnow: f64,
    /// Ice fraction of condensate, Ferrier scheme only.
    pub ice_fraction: Option<f64>,
}

/// Cloud fraction of a single cell.
///
/// Returns `Ok(0.0)` for unrecognized schemes and for cells without
/// condensate, and [`CloudFractionError::SaturationSingularity`] (with
/// index 0) when a cloudy cell's saturation formulas have a zero denominator.
pub fn cloud_fraction_cell(
    scheme: MicrophysicsScheme,
    cell: &CellState,
    c: &CloudConstants,
) -> Result<f64> {
    cell_fraction(scheme, cell, c).ok_or(CloudFractionError::SaturationSingularity {
        index: 0,
        temperature: cell.temperature,
        pressure: cell.pressure,
    })
}

/// Compute cloud fraction for every cell of the grid.
///
/// Cells are independent; the grid is processed as one flat parallel map.
/// Fails before computing anything if the fields disagree in shape or if the
/// Ferrier scheme is selected without an ice-fraction field, and fails fast
/// on a cloudy cell whose saturation formulas are singular.
pub fn compute_cloud_fraction(
    scheme: MicrophysicsScheme,
    fields: &ModelFields,
    c: &CloudConstants,
) -> Result<Field3D> {
    fields.validate()?;

    if scheme.needs_ice_fraction() && fields.ice_fraction.is_none() {
        return Err(CloudFractionError::MissingIceFraction { scheme: scheme.id() });
    }

    let shape = fields.shape();

    if !scheme.is_recognized() {
        debug!(
            scheme = scheme.id(),
            cells = shape.len(),
            "Unrecognized microphysics scheme, cloud fraction set to zero"
        );
        return Ok(Field3D::filled(shape, 0.0));
    }

    debug!(
        scheme = %scheme,
        nz = shape.nz,
        ny = shape.ny,
        nx = shape.nx,
        "Computing cloud fraction"
    );

    let data = (0..shape.len())
        .into_par_iter()
        .map(|index| {
            let cell = fields.cell(index);
            cell_fraction(scheme, &cell, c).ok_or(CloudFractionError::SaturationSingularity {
                index,
                temperature: cell.temperature,
                pressure: cell.pressure,
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Field3D::new(data, shape)
}

/// Per-cell kernel. `None` means a singular saturation formula.
fn cell_fraction(scheme: MicrophysicsScheme, cell: &CellState, c: &CloudConstants) -> Option<f64> {
    let partition = match scheme.partition(cell, c) {
        Some(partition) => partition,
        None => return Some(0.0),
    };
    // Clear regardless of humidity, even where saturation is singular
    if partition.condensate < c.qcld_min {
        return Some(0.0);
    }

    let saturation = SaturationMixingRatio::at(cell.temperature, cell.pressure, c)?;
    let qvs = saturation.blend(partition.ice_weight);
    let rh = cell.qvapor / qvs;

    Some(fraction_from_humidity(partition.condensate, qvs, cell.qvapor, rh, c))
}

#[inline]
fn fraction_from_humidity(qcld: f64, qvs: f64, qvapor: f64, rh: f64, c: &CloudConstants) -> f64 {
    if qcld < c.qcld_min {
        return 0.0;
    }
    if rh > c.rh_grid {
        return 1.0;
    }

    let subsat = (c.rh_grid * qvs - qvapor).max(c.subsat_floor);
    let denom = subsat.powf(c.gamma);
    let arg = (-c.alpha0 * qcld / denom).max(c.arg_floor);
    let rh = rh.max(c.rh_floor);

    let fraction = (rh / c.rh_grid).powf(c.pexp) * (1.0 - arg.exp());
    if fraction < c.min_fraction {
        0.0
    } else {
        fraction
    }
}
