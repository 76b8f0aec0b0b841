//! Diagnostic cloud fraction for WRF model output.
//!
//! This crate turns a snapshot of model moisture fields into a fractional
//! cloud cover in `[0, 1]` and reduces it to a 2D field by taking the column
//! maximum inside a pressure band (350-400 hPa by default).
//!
//! The parameterization follows Xu and Randall (1996) as adapted in the WRF
//! GFDL/Eta radiation code (modified by Ferrier, 2002). Saturation vapor
//! pressure uses the Murray (1966) exponential fit over water and over ice,
//! blended by an ice weight that depends on the microphysics scheme.
//!
//! # Architecture
//!
//! ```text
//! ModelFields (T, P, Qv, Qc, Qr, Qi, Qs [, F_ICE])
//!      │
//!      ▼
//! compute_cloud_fraction(scheme, fields, constants)
//!      │   per cell, in parallel:
//!      │     MicrophysicsScheme::partition ─► (QCLD, weight)
//!      │     SaturationMixingRatio::blend  ─► QVS
//!      │     cloud_fraction_from_humidity  ─► fraction
//!      ▼
//! Field3D (cloud fraction)
//!      │
//!      ▼
//! band_max(fraction, pressure_hpa, band, policy)
//!      │
//!      ▼
//! Field2D (one value per column)
//! ```
//!
//! # Example
//!
//! ```
//! use cloud_fraction::{
//!     band_max, compute_cloud_fraction, CloudConstants, EmptyBandPolicy, Field3D,
//!     MicrophysicsScheme, ModelFields, PressureBand,
//! };
//!
//! let shape = (3, 1, 1);
//! let fields = ModelFields {
//!     temperature: Field3D::filled(shape, 250.0),
//!     pressure: Field3D::new(vec![45_000.0, 38_000.0, 30_000.0], shape).unwrap(),
//!     qvapor: Field3D::filled(shape, 1.0e-4),
//!     qcloud: Field3D::filled(shape, 1.0e-5),
//!     qrain: Field3D::filled(shape, 0.0),
//!     qice: Field3D::filled(shape, 2.0e-5),
//!     qsnow: Field3D::filled(shape, 0.0),
//!     ice_fraction: None,
//! };
//!
//! let constants = CloudConstants::default();
//! let fraction = compute_cloud_fraction(MicrophysicsScheme::Lin, &fields, &constants).unwrap();
//! let column_max = band_max(
//!     &fraction,
//!     &fields.pressure_hpa(),
//!     PressureBand::default(),
//!     EmptyBandPolicy::Fail,
//! )
//! .unwrap();
//!
//! assert_eq!(column_max.shape(), (1, 1));
//! ```

pub mod band;
pub mod constants;
pub mod error;
pub mod field;
pub mod kernel;
pub mod saturation;
pub mod scheme;

// Re-export commonly used types at crate root
pub use band::{band_max, EmptyBandPolicy, PressureBand};
pub use constants::CloudConstants;
pub use error::{CloudFractionError, Result};
pub use field::{Field2D, Field3D, GridShape, ModelFields};
pub use kernel::{cloud_fraction_cell, compute_cloud_fraction, CellState};
pub use saturation::SaturationMixingRatio;
pub use scheme::{CondensatePartition, MicrophysicsScheme};
