//! Reading model fields from `wrfout` files.

use std::path::{Path, PathBuf};

use cloud_fraction::{Field3D, GridShape, MicrophysicsScheme, ModelFields};
use tracing::debug;

use crate::derive;
use crate::error::{WrfNetCdfError, WrfResult};
use crate::native::silence_hdf5_errors;

/// Dimension names of a mass-point WRF variable.
pub const MASS_DIMENSIONS: [&str; 4] = ["Time", "bottom_top", "south_north", "west_east"];

/// Global attribute holding the microphysics option.
pub const MP_PHYSICS_ATTR: &str = "MP_PHYSICS";

/// An open `wrfout` file.
pub struct WrfFile {
    file: netcdf::File,
    path: PathBuf,
    shape: GridShape,
    times: usize,
}

impl WrfFile {
    /// Open a `wrfout` file and determine its mass grid from the `T` variable.
    pub fn open(path: impl AsRef<Path>) -> WrfResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path)?;

        let (times, shape) = {
            let var = file
                .variable("T")
                .ok_or_else(|| WrfNetCdfError::MissingVariable("T".to_string()))?;
            grid_of(&var)?
        };

        debug!(
            path = %path.display(),
            times,
            nz = shape.nz,
            ny = shape.ny,
            nx = shape.nx,
            "Opened wrfout file"
        );

        Ok(Self {
            file,
            path,
            shape,
            times,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mass grid shape (bottom_top, south_north, west_east).
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of `Time` records.
    pub fn time_count(&self) -> usize {
        self.times
    }

    /// Microphysics scheme from the `MP_PHYSICS` global attribute.
    pub fn microphysics(&self) -> WrfResult<MicrophysicsScheme> {
        let missing = || WrfNetCdfError::MissingAttribute(MP_PHYSICS_ATTR.to_string());

        let value = self
            .file
            .attribute(MP_PHYSICS_ATTR)
            .ok_or_else(missing)?
            .value()?;
        let id = i32::try_from(value).map_err(|_| missing())?;
        Ok(MicrophysicsScheme::from_id(id))
    }

    /// Read and derive the kernel inputs for one time record.
    ///
    /// Temperature and full pressure are derived from `T`, `P` and `PB`.
    /// Moisture species that the run did not carry (e.g. `QICE` with a
    /// warm-rain scheme) are read as zero.
    pub fn read_fields(&self, time: usize) -> WrfResult<ModelFields> {
        if time >= self.times {
            return Err(WrfNetCdfError::TimeOutOfRange {
                index: time,
                count: self.times,
            });
        }

        let pressure = derive::full_pressure(
            &self.read_field("P", time)?,
            &self.read_field("PB", time)?,
        )?;
        let temperature = derive::temperature(&self.read_field("T", time)?, &pressure)?;

        Ok(ModelFields {
            temperature,
            pressure,
            qvapor: self.read_field("QVAPOR", time)?,
            qcloud: self.read_species("QCLOUD", time)?,
            qrain: self.read_species("QRAIN", time)?,
            qice: self.read_species("QICE", time)?,
            qsnow: self.read_species("QSNOW", time)?,
            ice_fraction: self.read_optional_field("F_ICE_PHY", time)?,
        })
    }

    /// Read a required 4D mass-point variable at one time record.
    pub fn read_field(&self, name: &str, time: usize) -> WrfResult<Field3D> {
        self.read_optional_field(name, time)?
            .ok_or_else(|| WrfNetCdfError::MissingVariable(name.to_string()))
    }

    /// Read a 4D mass-point variable if present.
    pub fn read_optional_field(&self, name: &str, time: usize) -> WrfResult<Option<Field3D>> {
        let var = match self.file.variable(name) {
            Some(var) => var,
            None => return Ok(None),
        };

        let (_, shape) = grid_of(&var)?;
        if shape != self.shape {
            return Err(WrfNetCdfError::invalid_shape(
                name,
                format!("expected {:?}, found {:?}", self.shape, shape),
            ));
        }

        let values: Vec<f32> =
            var.get_values([time..time + 1, 0..shape.nz, 0..shape.ny, 0..shape.nx])?;
        Ok(Some(Field3D::from_f32(&values, shape)?))
    }

    /// Read a moisture species, substituting zeros when it is absent.
    fn read_species(&self, name: &str, time: usize) -> WrfResult<Field3D> {
        match self.read_optional_field(name, time)? {
            Some(field) => Ok(field),
            None => {
                debug!(variable = name, "Species not in file, using zeros");
                Ok(Field3D::filled(self.shape, 0.0))
            }
        }
    }
}

/// Time record count and mass grid of a `(Time, bottom_top, south_north, west_east)` variable.
fn grid_of(var: &netcdf::Variable) -> WrfResult<(usize, GridShape)> {
    let dims = var.dimensions();
    let names: Vec<String> = dims.iter().map(|d| d.name()).collect();

    if names != MASS_DIMENSIONS {
        return Err(WrfNetCdfError::invalid_shape(
            var.name(),
            format!("expected dimensions (Time, bottom_top, south_north, west_east), found {:?}", names),
        ));
    }

    Ok((
        dims[0].len(),
        GridShape::new(dims[1].len(), dims[2].len(), dims[3].len()),
    ))
}
