//! Common test fixtures for cloud fraction tests.
//!
//! Reference cells and columns with values checked against the WRF
//! GFDL/Eta cloud fraction formula.

/// A mixed-phase cell (Lin scheme, MP_PHYSICS = 2).
pub mod lin_cell {
    pub const TEMPERATURE: f64 = 280.0;
    pub const PRESSURE: f64 = 90_000.0;
    pub const QCLOUD: f64 = 0.0005;
    pub const QICE: f64 = 0.0002;
    pub const QSNOW: f64 = 0.0001;
    pub const QRAIN: f64 = 0.0;

    /// Vapor giving RH ≈ 1.126, which is supersaturated.
    pub const QVAPOR_SUPERSATURATED: f64 = 0.008;

    /// Vapor giving RH ≈ 0.704.
    pub const QVAPOR_SUBSATURATED: f64 = 0.005;

    /// Expected fraction for `QVAPOR_SUBSATURATED`.
    pub const FRACTION_SUBSATURATED: f64 = 0.7381710201623303;

    /// Saturation vapor pressure over water at 280 K (Pa).
    pub const ESW: f64 = 991.5562272647936;

    /// Saturation vapor pressure over ice at 280 K (Pa).
    pub const ESI: f64 = 1058.845138085287;

    /// Blended saturation mixing ratio (ice weight 0.375).
    pub const QVS: f64 = 0.007104675735645565;
}

/// A single column crossing the 350-400 hPa band.
pub mod band_column {
    /// Pressure of each level (hPa), surface first.
    pub const PRESSURE_HPA: [f64; 5] = [500.0, 450.0, 380.0, 370.0, 300.0];

    /// Cloud fraction of each level.
    pub const FRACTION: [f64; 5] = [0.1, 0.2, 0.9, 0.4, 0.0];

    /// Max over the 380 and 370 hPa levels.
    pub const EXPECTED_MAX: f64 = 0.9;

    /// A column that jumps over the band.
    pub const PRESSURE_HPA_NO_BAND: [f64; 5] = [700.0, 550.0, 400.0, 350.0, 200.0];
}

/// Names of optional real-data samples.
pub mod samples {
    /// A small wrfout file (Lin microphysics) for end-to-end tests.
    pub const WRFOUT: &str = "wrfout_d01_sample.nc";
}
