//! NetCDF access for WRF model output.
//!
//! This crate reads the fields needed by the cloud fraction kernel from a
//! `wrfout` file and writes the resulting band-max field back into the same
//! file as a new variable.
//!
//! # WRF Data Structure
//!
//! Mass-point variables are stored as `(Time, bottom_top, south_north,
//! west_east)` single-precision arrays. Pressure is split into a base state
//! `PB` and a perturbation `P`; temperature is stored as perturbation
//! potential temperature `T` about 300 K. The microphysics option is the
//! global attribute `MP_PHYSICS`.
//!
//! # Implementation Notes
//!
//! Uses the native `netcdf` crate (libnetcdf + HDF5). HDF5's diagnostic
//! printing is silenced before any file is opened.

pub mod derive;
pub mod error;
pub mod native;
pub mod reader;
pub mod writer;

pub use error::{WrfNetCdfError, WrfResult};
pub use native::silence_hdf5_errors;
pub use reader::WrfFile;
pub use writer::{write_cloud_fraction, WriteOptions, CLDFRA_ATTRIBUTES, CLDFRA_VAR};
