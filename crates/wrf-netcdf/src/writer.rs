//! Writing the band-max cloud fraction back into a `wrfout` file.

use std::path::Path;

use cloud_fraction::Field2D;
use tracing::{debug, info};

use crate::error::{WrfNetCdfError, WrfResult};
use crate::native::silence_hdf5_errors;

/// Name of the output variable.
pub const CLDFRA_VAR: &str = "cldfra";

/// Singleton vertical dimension of the output variable.
pub const CLDFRA_LEVEL_DIM: &str = "cldfra_l";

/// Attributes attached to the output variable, WRF registry style.
pub const CLDFRA_ATTRIBUTES: [(&str, &str); 6] = [
    ("description", "CloudFraction generated from wrf"),
    ("FieldType", "104"),
    ("MemoryOrder", "XYZ"),
    ("units", ""),
    ("stagger", ""),
    ("coordinates", "XLONG XLAT"),
];

/// Options controlling how the output variable is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Replace an existing `cldfra` variable instead of failing.
    pub overwrite: bool,
}

/// Write one band-max field per `Time` record as `cldfra(Time, cldfra_l, south_north, west_east)`.
///
/// The caller computes every record before calling this, so a failed
/// computation never leaves a partially written variable behind.
pub fn write_cloud_fraction(
    path: impl AsRef<Path>,
    records: &[Field2D],
    options: WriteOptions,
) -> WrfResult<()> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let mut file = netcdf::append(path)?;

    let times = dimension_len(&file, "Time")?;
    let ny = dimension_len(&file, "south_north")?;
    let nx = dimension_len(&file, "west_east")?;

    if records.len() != times {
        return Err(WrfNetCdfError::invalid_shape(
            CLDFRA_VAR,
            format!("{} records for {} Time entries", records.len(), times),
        ));
    }
    if let Some(record) = records.iter().find(|r| r.shape() != (ny, nx)) {
        return Err(WrfNetCdfError::invalid_shape(
            CLDFRA_VAR,
            format!("record shape {:?}, grid is ({}, {})", record.shape(), ny, nx),
        ));
    }

    let exists = file.variable(CLDFRA_VAR).is_some();
    if exists && !options.overwrite {
        return Err(WrfNetCdfError::AlreadyExists(CLDFRA_VAR.to_string()));
    }

    if file.dimension(CLDFRA_LEVEL_DIM).is_none() {
        file.add_dimension(CLDFRA_LEVEL_DIM, 1)?;
    }

    let mut var = if exists {
        debug!(path = %path.display(), "Overwriting existing cldfra variable");
        file.variable_mut(CLDFRA_VAR)
            .ok_or_else(|| WrfNetCdfError::MissingVariable(CLDFRA_VAR.to_string()))?
    } else {
        let mut var = file.add_variable::<f32>(
            CLDFRA_VAR,
            &["Time", CLDFRA_LEVEL_DIM, "south_north", "west_east"],
        )?;
        for (name, value) in CLDFRA_ATTRIBUTES {
            var.put_attribute(name, value)?;
        }
        var
    };

    for (time, record) in records.iter().enumerate() {
        var.put_values(&record.to_f32(), [time..time + 1, 0..1, 0..ny, 0..nx])?;
    }

    info!(
        path = %path.display(),
        records = records.len(),
        ny,
        nx,
        "Wrote cldfra"
    );

    Ok(())
}

fn dimension_len(file: &netcdf::File, name: &str) -> WrfResult<usize> {
    file.dimension(name)
        .map(|d| d.len())
        .ok_or_else(|| WrfNetCdfError::invalid_shape(name, "dimension not found"))
}
