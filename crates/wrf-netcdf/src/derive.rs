//! Diagnostics derived from raw WRF state variables.
//!
//! WRF stores pressure as a perturbation `P` on a base state `PB`, and
//! temperature as a perturbation potential temperature `T` about 300 K.

use cloud_fraction::{CloudFractionError, Field3D, Result};

/// Reference pressure for potential temperature (Pa).
pub const P1000MB: f64 = 100_000.0;

/// Base state potential temperature (K).
pub const T_BASE: f64 = 300.0;

/// Gas constant of dry air (J/kg/K).
pub const R_D: f64 = 287.0;

/// Specific heat of dry air at constant pressure (J/kg/K), `7 * R_D / 2`.
pub const CP: f64 = 7.0 * R_D / 2.0;

/// Full pressure `P + PB` (Pa).
pub fn full_pressure(perturbation: &Field3D, base: &Field3D) -> Result<Field3D> {
    perturbation.add(base, "PB")
}

/// Temperature (K) from perturbation potential temperature and full pressure.
///
/// `T = (theta' + 300) * (p / 1000 hPa)^(R_d / c_p)`
pub fn temperature(theta_perturbation: &Field3D, pressure: &Field3D) -> Result<Field3D> {
    if theta_perturbation.shape() != pressure.shape() {
        return Err(CloudFractionError::shape_mismatch(
            "pressure",
            theta_perturbation.shape(),
            pressure.shape(),
        ));
    }

    let data = theta_perturbation
        .data()
        .iter()
        .zip(pressure.data())
        .map(|(theta, p)| (theta + T_BASE) * (p / P1000MB).powf(R_D / CP))
        .collect();
    Field3D::new(data, theta_perturbation.shape())
}
