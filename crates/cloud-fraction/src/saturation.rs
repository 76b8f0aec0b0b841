//! Saturation vapor pressure and saturation mixing ratio.
//!
//! Murray, F.W. 1966: "On the computation of saturation vapor pressure".
//! J. Appl. Meteor. 6, p. 204.
//!
//! ```text
//! es (Pa) = 1000 * 0.61078 * exp[ a * (T - 273.15) / (T - b) ]
//!
//!        over water    over ice
//!   a    17.2693882    21.8745584
//!   b    35.86         7.66
//! ```

use crate::constants::CloudConstants;

/// Saturation vapor pressure over liquid water (Pa).
#[inline]
pub fn vapor_pressure_water(temperature: f64, c: &CloudConstants) -> f64 {
    let tc = temperature - c.svpt0;
    1000.0 * c.svp1 * (c.svp2 * tc / (temperature - c.svp3)).exp()
}

/// Saturation vapor pressure over ice (Pa).
#[inline]
pub fn vapor_pressure_ice(temperature: f64, c: &CloudConstants) -> f64 {
    let tc = temperature - c.svpt0;
    1000.0 * c.svp1 * (c.svpi2 * tc / (temperature - c.svpi3)).exp()
}

/// Saturation mixing ratio (kg/kg) for a vapor pressure at total pressure `pressure`.
#[inline]
pub fn mixing_ratio(vapor_pressure: f64, pressure: f64, c: &CloudConstants) -> f64 {
    c.ep2() * vapor_pressure / (pressure - vapor_pressure)
}

/// Saturation mixing ratios of a cell with respect to water and to ice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationMixingRatio {
    pub water: f64,
    pub ice: f64,
}

impl SaturationMixingRatio {
    /// Evaluate both saturation mixing ratios at (T, P).
    ///
    /// Returns `None` when a denominator vanishes: T equal to one of the
    /// Murray `b` coefficients, or P equal to the vapor pressure.
    pub fn at(temperature: f64, pressure: f64, c: &CloudConstants) -> Option<Self> {
        if temperature == c.svp3 || temperature == c.svpi3 {
            return None;
        }

        let esw = vapor_pressure_water(temperature, c);
        let esi = vapor_pressure_ice(temperature, c);
        if pressure == esw || pressure == esi {
            return None;
        }

        Some(Self {
            water: mixing_ratio(esw, pressure, c),
            ice: mixing_ratio(esi, pressure, c),
        })
    }

    /// Blend by ice weight: `(1 - weight) * water + weight * ice`.
    #[inline]
    pub fn blend(&self, ice_weight: f64) -> f64 {
        (1.0 - ice_weight) * self.water + ice_weight * self.ice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vapor_pressure_at_freezing() {
        let c = CloudConstants::default();
        // At 0 C both fits reduce to the reference pressure
        assert!((vapor_pressure_water(273.15, &c) - 610.78).abs() < 1e-9);
        assert!((vapor_pressure_ice(273.15, &c) - 610.78).abs() < 1e-9);
    }

    #[test]
    fn test_vapor_pressure_at_280k() {
        let c = CloudConstants::default();
        assert!((vapor_pressure_water(280.0, &c) - 991.556227).abs() < 1e-5);
        assert!((vapor_pressure_ice(280.0, &c) - 1058.845138).abs() < 1e-5);
    }

    #[test]
    fn test_ice_below_water_when_cold() {
        let c = CloudConstants::default();
        let sat = SaturationMixingRatio::at(250.0, 50_000.0, &c).unwrap();
        assert!(sat.ice < sat.water);
    }

    #[test]
    fn test_blend_endpoints() {
        let sat = SaturationMixingRatio {
            water: 0.004,
            ice: 0.003,
        };
        assert_eq!(sat.blend(0.0), 0.004);
        assert_eq!(sat.blend(1.0), 0.003);
        assert!((sat.blend(0.5) - 0.0035).abs() < 1e-15);
    }

    #[test]
    fn test_singular_temperatures() {
        let c = CloudConstants::default();
        assert!(SaturationMixingRatio::at(35.86, 50_000.0, &c).is_none());
        assert!(SaturationMixingRatio::at(7.66, 50_000.0, &c).is_none());
        let esw = vapor_pressure_water(273.15, &c);
        assert!(SaturationMixingRatio::at(273.15, esw, &c).is_none());
    }
}
