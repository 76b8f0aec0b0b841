//! Microphysics scheme dispatch.
//!
//! WRF's `MP_PHYSICS` option decides which moisture species count as cloud
//! condensate and how condensate is split between water and ice when
//! blending saturation mixing ratios.

use serde::{Deserialize, Serialize};

use crate::constants::CloudConstants;
use crate::kernel::CellState;

/// WRF microphysics option (`MP_PHYSICS` global attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MicrophysicsScheme {
    /// 1: Kessler warm rain (qc only).
    Kessler,
    /// 2: Purdue Lin (qc, qi, qs).
    Lin,
    /// 3: WSM 3-class; qc holds water or ice depending on temperature.
    Wsm3,
    /// 4: WSM 5-class.
    Wsm5,
    /// 5: Ferrier (Eta); qs carries total ice, partition from F_ICE_PHY.
    Ferrier,
    /// 6: WSM 6-class graupel.
    Wsm6,
    /// 7: Goddard.
    Goddard,
    /// 8: Thompson.
    Thompson,
    /// Any option without a condensate rule; always yields clear sky.
    Unrecognized(i32),
}

impl MicrophysicsScheme {
    /// Map an `MP_PHYSICS` value to a scheme.
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Self::Kessler,
            2 => Self::Lin,
            3 => Self::Wsm3,
            4 => Self::Wsm5,
            5 => Self::Ferrier,
            6 => Self::Wsm6,
            7 => Self::Goddard,
            8 => Self::Thompson,
            other => Self::Unrecognized(other),
        }
    }

    /// The `MP_PHYSICS` value of this scheme.
    pub fn id(&self) -> i32 {
        match self {
            Self::Kessler => 1,
            Self::Lin => 2,
            Self::Wsm3 => 3,
            Self::Wsm5 => 4,
            Self::Ferrier => 5,
            Self::Wsm6 => 6,
            Self::Goddard => 7,
            Self::Thompson => 8,
            Self::Unrecognized(id) => *id,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Whether this scheme reads the ice-fraction field.
    pub fn needs_ice_fraction(&self) -> bool {
        matches!(self, Self::Ferrier)
    }

    /// Total cloud condensate and ice weight of a cell.
    ///
    /// Returns `None` for unrecognized schemes. The ice weight is zero
    /// whenever condensate is below `qcld_min`.
    pub fn partition(&self, cell: &CellState, c: &CloudConstants) -> Option<CondensatePartition> {
        let partition = match self {
            // qc = liquid, qi = ice, qs = snow
            Self::Lin | Self::Wsm5 | Self::Wsm6 | Self::Goddard | Self::Thompson => {
                let condensate = cell.qice + cell.qcloud + cell.qsnow;
                let ice_weight = if condensate < c.qcld_min {
                    0.0
                } else {
                    (cell.qice + cell.qsnow) / condensate
                };
                CondensatePartition {
                    condensate,
                    ice_weight,
                }
            }

            // qc only; ice when at or below freezing
            Self::Kessler | Self::Wsm3 => {
                let condensate = cell.qcloud;
                let ice_weight = if condensate < c.qcld_min || cell.temperature > c.svpt0 {
                    0.0
                } else {
                    1.0
                };
                CondensatePartition {
                    condensate,
                    ice_weight,
                }
            }

            // qc = liquid, qs = total ice; rain is not cloud
            Self::Ferrier => {
                let condensate = cell.qcloud + cell.qsnow;
                let ice_weight = if condensate < c.qcld_min {
                    0.0
                } else {
                    // Presence is checked once per grid before the kernel runs
                    cell.ice_fraction.unwrap_or(0.0)
                };
                CondensatePartition {
                    condensate,
                    ice_weight,
                }
            }

            Self::Unrecognized(_) => return None,
        };

        Some(partition)
    }
}

impl std::fmt::Display for MicrophysicsScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Kessler => "kessler",
            Self::Lin => "lin",
            Self::Wsm3 => "wsm3",
            Self::Wsm5 => "wsm5",
            Self::Ferrier => "ferrier",
            Self::Wsm6 => "wsm6",
            Self::Goddard => "goddard",
            Self::Thompson => "thompson",
            Self::Unrecognized(id) => return write!(f, "unrecognized({})", id),
        };
        write!(f, "{} ({})", name, self.id())
    }
}

/// Cloud condensate of a cell and the share of it treated as ice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondensatePartition {
    /// Total cloud mixing ratio QCLD (kg/kg).
    pub condensate: f64,
    /// Ice weight in `[0, 1]` for blending saturation mixing ratios.
    pub ice_weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(temperature: f64, qcloud: f64, qice: f64, qsnow: f64) -> CellState {
        CellState {
            temperature,
            pressure: 50_000.0,
            qvapor: 0.001,
            qcloud,
            qrain: 0.0,
            qice,
            qsnow,
            ice_fraction: None,
        }
    }

    #[test]
    fn test_id_roundtrip_for_known_options() {
        for id in 1..=8 {
            let scheme = MicrophysicsScheme::from_id(id);
            assert!(scheme.is_recognized());
            assert_eq!(scheme.id(), id);
        }
        assert_eq!(
            MicrophysicsScheme::from_id(28),
            MicrophysicsScheme::Unrecognized(28)
        );
    }

    #[test]
    fn test_mixed_phase_weight() {
        let c = CloudConstants::default();
        let p = MicrophysicsScheme::Lin
            .partition(&cell(260.0, 0.0005, 0.0002, 0.0001), &c)
            .unwrap();
        assert!((p.condensate - 0.0008).abs() < 1e-15);
        assert!((p.ice_weight - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_mixed_phase_ignores_rain() {
        let c = CloudConstants::default();
        let mut state = cell(280.0, 0.0, 0.0, 0.0);
        state.qrain = 0.01;
        let p = MicrophysicsScheme::Thompson.partition(&state, &c).unwrap();
        assert_eq!(p.condensate, 0.0);
        assert_eq!(p.ice_weight, 0.0);
    }

    #[test]
    fn test_warm_rain_weight_split_at_freezing() {
        let c = CloudConstants::default();
        let scheme = MicrophysicsScheme::Wsm3;

        let warm = scheme.partition(&cell(273.16, 0.001, 0.5, 0.5), &c).unwrap();
        assert_eq!(warm.condensate, 0.001);
        assert_eq!(warm.ice_weight, 0.0);

        let boundary = scheme.partition(&cell(273.15, 0.001, 0.0, 0.0), &c).unwrap();
        assert_eq!(boundary.ice_weight, 1.0);

        let cold = MicrophysicsScheme::Kessler
            .partition(&cell(250.0, 0.001, 0.0, 0.0), &c)
            .unwrap();
        assert_eq!(cold.ice_weight, 1.0);
    }

    #[test]
    fn test_ferrier_uses_ice_fraction() {
        let c = CloudConstants::default();
        let mut state = cell(265.0, 0.0003, 0.9, 0.0001);
        state.ice_fraction = Some(0.8);
        let p = MicrophysicsScheme::Ferrier.partition(&state, &c).unwrap();
        assert!((p.condensate - 0.0004).abs() < 1e-15);
        assert_eq!(p.ice_weight, 0.8);
    }

    #[test]
    fn test_unrecognized_has_no_partition() {
        let c = CloudConstants::default();
        let p = MicrophysicsScheme::Unrecognized(10).partition(&cell(260.0, 0.001, 0.0, 0.0), &c);
        assert!(p.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(MicrophysicsScheme::Thompson.to_string(), "thompson (8)");
        assert_eq!(MicrophysicsScheme::Unrecognized(99).to_string(), "unrecognized(99)");
    }
}
