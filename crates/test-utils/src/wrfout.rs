//! Synthetic `wrfout` files for I/O tests.
//!
//! Files carry the mass-point variables read by the cloud fraction pipeline
//! (`T`, `P`, `PB`, `QVAPOR`, `QCLOUD`, `QRAIN`, `QICE`, `QSNOW`) on a
//! `(Time, bottom_top, south_north, west_east)` grid, with every Time record
//! identical.

use std::path::Path;

use crate::generators::{create_mixing_ratio_field, create_pressure_field, create_temperature_field};

/// Dimensions of a mass-point WRF variable.
pub const WRF_DIMS: [&str; 4] = ["Time", "bottom_top", "south_north", "west_east"];

/// Constant pressure perturbation `P` (Pa) added to the base state.
pub const PRESSURE_PERTURBATION: f64 = 40.0;

/// Description of a synthetic wrfout file.
#[derive(Debug, Clone)]
pub struct SyntheticWrfout {
    pub times: usize,
    pub nz: usize,
    pub ny: usize,
    pub nx: usize,
    /// Value of the `MP_PHYSICS` global attribute, omitted when `None`.
    pub mp_physics: Option<i32>,
    /// Whether `QICE` is written.
    pub with_ice: bool,
}

impl Default for SyntheticWrfout {
    fn default() -> Self {
        // 30 levels from 1000 to 100 hPa always put one level near 379 hPa
        Self {
            times: 2,
            nz: 30,
            ny: 4,
            nx: 5,
            mp_physics: Some(2),
            with_ice: true,
        }
    }
}

impl SyntheticWrfout {
    /// Cells per Time record.
    pub fn len(&self) -> usize {
        self.nz * self.ny * self.nx
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full pressure `P + PB` (Pa) of one record.
    pub fn pressure(&self) -> Vec<f64> {
        create_pressure_field(self.nz, self.ny, self.nx)
            .iter()
            .map(|pb| pb + PRESSURE_PERTURBATION)
            .collect()
    }

    /// Temperature (K) of one record.
    pub fn temperature(&self) -> Vec<f64> {
        create_temperature_field(&self.pressure())
    }

    /// Write the file at `path`, panicking on any NetCDF error.
    pub fn write(&self, path: &Path) {
        // Potential temperature uses R_d / c_p = 287 / 1004.5 and p0 = 1000 hPa
        let kappa = 287.0 / 1004.5;

        let mut file = netcdf::create(path).expect("Failed to create wrfout file");
        for (name, len) in WRF_DIMS.iter().zip([self.times, self.nz, self.ny, self.nx]) {
            file.add_dimension(name, len).expect("Failed to add dimension");
        }
        if let Some(mp) = self.mp_physics {
            file.add_attribute("MP_PHYSICS", mp)
                .expect("Failed to add MP_PHYSICS");
        }

        let pressure = self.pressure();
        let theta_perturbation: Vec<f64> = self
            .temperature()
            .iter()
            .zip(&pressure)
            .map(|(t, p)| t / (p / 100_000.0).powf(kappa) - 300.0)
            .collect();

        let len = self.len();
        let mut variables = vec![
            ("T", theta_perturbation),
            ("P", vec![PRESSURE_PERTURBATION; len]),
            ("PB", create_pressure_field(self.nz, self.ny, self.nx)),
            ("QVAPOR", create_mixing_ratio_field(len, 4e-3, 1)),
            ("QCLOUD", create_mixing_ratio_field(len, 3e-4, 2)),
            ("QRAIN", create_mixing_ratio_field(len, 1e-4, 3)),
            ("QSNOW", create_mixing_ratio_field(len, 1e-4, 5)),
        ];
        if self.with_ice {
            variables.push(("QICE", create_mixing_ratio_field(len, 1e-4, 4)));
        }

        for (name, record) in variables {
            let values: Vec<f32> = record
                .iter()
                .map(|&v| v as f32)
                .cycle()
                .take(len * self.times)
                .collect();
            let mut var = file
                .add_variable::<f32>(name, &WRF_DIMS)
                .expect("Failed to add variable");
            var.put_values(&values, ..).expect("Failed to write variable");
        }
    }

    /// Write the file as `dir/name` and return its path.
    pub fn write_in(&self, dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        self.write(&path);
        path
    }
}
