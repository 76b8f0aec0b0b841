//! Physical constants and tuning parameters of the cloud fraction scheme.

use serde::{Deserialize, Serialize};

/// Immutable constants used by the cloud fraction kernel.
///
/// `Default` yields the values of the WRF GFDL/Eta radiation code. Missing
/// fields fall back to those values when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConstants {
    /// Condensate scaling in the exponential term (`ALPHA0`).
    pub alpha0: f64,
    /// Exponent applied to the subsaturation (`GAMMA`).
    pub gamma: f64,
    /// Minimum total condensate for a cell to be cloudy (kg/kg).
    pub qcld_min: f64,
    /// Exponent applied to relative humidity (`PEXP`).
    pub pexp: f64,
    /// Critical relative humidity for grid-scale saturation.
    pub rh_grid: f64,

    /// Murray (1966) reference vapor pressure (kPa).
    pub svp1: f64,
    /// Murray coefficient `a` over water.
    pub svp2: f64,
    /// Murray coefficient `a` over ice.
    pub svpi2: f64,
    /// Murray coefficient `b` over water (K).
    pub svp3: f64,
    /// Murray coefficient `b` over ice (K).
    pub svpi3: f64,
    /// Freezing point (K).
    pub svpt0: f64,

    /// Gas constant of dry air (J/kg/K).
    pub r_d: f64,
    /// Gas constant of water vapor (J/kg/K).
    pub r_v: f64,

    /// Fractions below this value are reported as clear sky.
    pub min_fraction: f64,
    /// Lower bound on the exponential argument (`exp(-6.9) ≈ 0.001`).
    pub arg_floor: f64,
    /// Lower bound on the subsaturation (kg/kg).
    pub subsat_floor: f64,
    /// Lower bound on relative humidity before the power law.
    pub rh_floor: f64,
}

impl Default for CloudConstants {
    fn default() -> Self {
        Self {
            alpha0: 100.0,
            gamma: 0.49,
            qcld_min: 1.0e-12,
            pexp: 0.25,
            rh_grid: 1.0,
            svp1: 0.61078,
            svp2: 17.2693882,
            svpi2: 21.8745584,
            svp3: 35.86,
            svpi3: 7.66,
            svpt0: 273.15,
            r_d: 287.0,
            r_v: 461.6,
            min_fraction: 0.01,
            arg_floor: -6.9,
            subsat_floor: 1.0e-10,
            rh_floor: 1.0e-10,
        }
    }
}

impl CloudConstants {
    /// Ratio of gas constants `R_d / R_v` (`ep_2` in WRF).
    #[inline]
    pub fn ep2(&self) -> f64 {
        self.r_d / self.r_v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ep2_matches_wrf() {
        let c = CloudConstants::default();
        assert!((c.ep2() - 287.0 / 461.6).abs() < 1e-15);
        assert!((c.ep2() - 0.62175).abs() < 1e-5);
    }

    #[test]
    fn test_default_arg_floor_is_one_per_mille() {
        let c = CloudConstants::default();
        assert!((c.arg_floor.exp() - 0.001).abs() < 1e-5);
    }
}
