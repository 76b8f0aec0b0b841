//! Dense grid fields.
//!
//! Fields are stored flattened in row-major order with the vertical axis
//! slowest: `index = k * ny * nx + j * nx + i`. This matches the
//! `(bottom_top, south_north, west_east)` layout of WRF output.

use crate::error::{CloudFractionError, Result};
use crate::kernel::CellState;

/// Shape of a 3D grid as (levels, rows, columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of vertical levels.
    pub nz: usize,
    /// Number of rows (south_north).
    pub ny: usize,
    /// Number of columns (west_east).
    pub nx: usize,
}

impl GridShape {
    /// Create a new grid shape.
    pub fn new(nz: usize, ny: usize, nx: usize) -> Self {
        Self { nz, ny, nx }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nz * self.ny * self.nx
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of horizontal columns.
    pub fn columns(&self) -> usize {
        self.ny * self.nx
    }

    /// Flat index of cell (k, j, i).
    #[inline]
    pub fn flat_index(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.ny + j) * self.nx + i
    }
}

impl From<(usize, usize, usize)> for GridShape {
    fn from((nz, ny, nx): (usize, usize, usize)) -> Self {
        Self::new(nz, ny, nx)
    }
}

/// A 3D scalar field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field3D {
    data: Vec<f64>,
    shape: GridShape,
}

impl Field3D {
    /// Create a field, checking that `data` fills the shape exactly.
    pub fn new(data: Vec<f64>, shape: impl Into<GridShape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.len() {
            return Err(CloudFractionError::InvalidLength {
                len: data.len(),
                shape,
                expected: shape.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Create a field with every cell set to `value`.
    pub fn filled(shape: impl Into<GridShape>, value: f64) -> Self {
        let shape = shape.into();
        Self {
            data: vec![value; shape.len()],
            shape,
        }
    }

    /// Create a field from single-precision model output.
    pub fn from_f32(data: &[f32], shape: impl Into<GridShape>) -> Result<Self> {
        Self::new(data.iter().map(|&v| f64::from(v)).collect(), shape)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Value at (k, j, i), or `None` if out of range.
    pub fn get(&self, k: usize, j: usize, i: usize) -> Option<f64> {
        if k >= self.shape.nz || j >= self.shape.ny || i >= self.shape.nx {
            return None;
        }
        self.data.get(self.shape.flat_index(k, j, i)).copied()
    }

    /// Iterate the vertical column at (j, i), bottom level first.
    pub fn column(&self, j: usize, i: usize) -> impl Iterator<Item = f64> + '_ {
        let shape = self.shape;
        (0..shape.nz).map(move |k| self.data[shape.flat_index(k, j, i)])
    }

    /// Apply `f` to every value, producing a new field of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape,
        }
    }

    /// Add two fields cell by cell.
    pub fn add(&self, other: &Field3D, name: &'static str) -> Result<Self> {
        if other.shape != self.shape {
            return Err(CloudFractionError::shape_mismatch(
                name,
                self.shape,
                other.shape,
            ));
        }
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
            shape: self.shape,
        })
    }
}

/// A 2D field with one value per horizontal column.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    data: Vec<f64>,
    ny: usize,
    nx: usize,
}

impl Field2D {
    pub(crate) fn from_parts(data: Vec<f64>, ny: usize, nx: usize) -> Self {
        debug_assert_eq!(data.len(), ny * nx);
        Self { data, ny, nx }
    }

    /// Shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at (j, i), or `None` if out of range.
    pub fn get(&self, j: usize, i: usize) -> Option<f64> {
        if j >= self.ny || i >= self.nx {
            return None;
        }
        self.data.get(j * self.nx + i).copied()
    }

    /// Single-precision copy for writing back to model output.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }
}

/// The model state needed by the cloud fraction kernel.
///
/// Temperature is in K, pressure in Pa and mixing ratios in kg/kg.
#[derive(Debug, Clone)]
pub struct ModelFields {
    pub temperature: Field3D,
    pub pressure: Field3D,
    pub qvapor: Field3D,
    pub qcloud: Field3D,
    pub qrain: Field3D,
    pub qice: Field3D,
    pub qsnow: Field3D,
    /// Fraction of condensate that is ice (`F_ICE_PHY`), used by the Ferrier scheme.
    pub ice_fraction: Option<Field3D>,
}

impl ModelFields {
    /// Grid shape, taken from the temperature field.
    pub fn shape(&self) -> GridShape {
        self.temperature.shape()
    }

    /// Check that every field shares the temperature field's shape.
    pub fn validate(&self) -> Result<()> {
        let expected = self.shape();
        let fields = [
            ("pressure", Some(&self.pressure)),
            ("qvapor", Some(&self.qvapor)),
            ("qcloud", Some(&self.qcloud)),
            ("qrain", Some(&self.qrain)),
            ("qice", Some(&self.qice)),
            ("qsnow", Some(&self.qsnow)),
            ("ice_fraction", self.ice_fraction.as_ref()),
        ];

        for (name, field) in fields {
            if let Some(field) = field {
                if field.shape() != expected {
                    return Err(CloudFractionError::shape_mismatch(
                        name,
                        expected,
                        field.shape(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Gather the inputs of a single cell by flat index.
    ///
    /// Callers must have validated the shapes first.
    #[inline]
    pub fn cell(&self, index: usize) -> CellState {
        CellState {
            temperature: self.temperature.data[index],
            pressure: self.pressure.data[index],
            qvapor: self.qvapor.data[index],
            qcloud: self.qcloud.data[index],
            qrain: self.qrain.data[index],
            qice: self.qice.data[index],
            qsnow: self.qsnow.data[index],
            ice_fraction: self.ice_fraction.as_ref().map(|f| f.data[index]),
        }
    }

    /// Pressure converted from Pa to hPa.
    pub fn pressure_hpa(&self) -> Field3D {
        self.pressure.map(|p| p / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Field3D::new(vec![0.0; 5], (2, 2, 2)).unwrap_err();
        assert!(matches!(
            err,
            CloudFractionError::InvalidLength { len: 5, expected: 8, .. }
        ));
    }

    #[test]
    fn test_flat_index_vertical_slowest() {
        let shape = GridShape::new(2, 3, 4);
        assert_eq!(shape.flat_index(0, 0, 0), 0);
        assert_eq!(shape.flat_index(0, 0, 1), 1);
        assert_eq!(shape.flat_index(0, 1, 0), 4);
        assert_eq!(shape.flat_index(1, 0, 0), 12);
        assert_eq!(shape.flat_index(1, 2, 3), 23);
    }

    #[test]
    fn test_column_iterates_levels() {
        let data: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let field = Field3D::new(data, (3, 2, 2)).unwrap();
        let column: Vec<f64> = field.column(1, 0).collect();
        assert_eq!(column, vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn test_get_out_of_range() {
        let field = Field3D::filled((1, 1, 1), 3.0);
        assert_eq!(field.get(0, 0, 0), Some(3.0));
        assert_eq!(field.get(1, 0, 0), None);
        assert_eq!(field.get(0, 0, 1), None);
    }

    #[test]
    fn test_add_checks_shape() {
        let a = Field3D::filled((1, 2, 2), 1.0);
        let b = Field3D::filled((1, 2, 2), 2.0);
        assert_eq!(a.add(&b, "b").unwrap().data(), &[3.0; 4]);

        let c = Field3D::filled((2, 2, 2), 2.0);
        assert!(matches!(
            a.add(&c, "c"),
            Err(CloudFractionError::ShapeMismatch { field: "c", .. })
        ));
    }

    #[test]
    fn test_validate_reports_mismatched_field() {
        let shape = (2, 1, 1);
        let mut fields = ModelFields {
            temperature: Field3D::filled(shape, 270.0),
            pressure: Field3D::filled(shape, 50_000.0),
            qvapor: Field3D::filled(shape, 0.0),
            qcloud: Field3D::filled(shape, 0.0),
            qrain: Field3D::filled(shape, 0.0),
            qice: Field3D::filled(shape, 0.0),
            qsnow: Field3D::filled(shape, 0.0),
            ice_fraction: None,
        };
        assert!(fields.validate().is_ok());

        fields.ice_fraction = Some(Field3D::filled((1, 1, 1), 0.5));
        assert!(matches!(
            fields.validate(),
            Err(CloudFractionError::ShapeMismatch {
                field: "ice_fraction",
                ..
            })
        ));
    }

    #[test]
    fn test_pressure_hpa() {
        let shape = (1, 1, 2);
        let fields = ModelFields {
            temperature: Field3D::filled(shape, 270.0),
            pressure: Field3D::new(vec![38_000.0, 101_325.0], shape).unwrap(),
            qvapor: Field3D::filled(shape, 0.0),
            qcloud: Field3D::filled(shape, 0.0),
            qrain: Field3D::filled(shape, 0.0),
            qice: Field3D::filled(shape, 0.0),
            qsnow: Field3D::filled(shape, 0.0),
            ice_fraction: None,
        };
        let hpa = fields.pressure_hpa();
        assert!((hpa.data()[0] - 380.0).abs() < 1e-12);
        assert!((hpa.data()[1] - 1013.25).abs() < 1e-12);
    }
}
