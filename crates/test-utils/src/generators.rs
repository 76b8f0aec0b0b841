//! Synthetic atmosphere generators.
//!
//! All 3D generators return data flattened with the vertical axis slowest
//! (`k * ny * nx + j * nx + i`), level 0 at the surface, matching WRF's
//! `(bottom_top, south_north, west_east)` layout.

/// Evenly spaced pressure levels (hPa) from `surface_hpa` down to `top_hpa`.
///
/// # Example
///
/// ```
/// use test_utils::pressure_levels_hpa;
///
/// let levels = pressure_levels_hpa(5, 500.0, 300.0);
/// assert_eq!(levels, vec![500.0, 450.0, 400.0, 350.0, 300.0]);
/// ```
pub fn pressure_levels_hpa(nz: usize, surface_hpa: f64, top_hpa: f64) -> Vec<f64> {
    if nz == 1 {
        return vec![surface_hpa];
    }
    let step = (surface_hpa - top_hpa) / (nz - 1) as f64;
    (0..nz).map(|k| surface_hpa - k as f64 * step).collect()
}

/// Creates a 3D pressure field in Pa.
///
/// Levels run from 1000 hPa to 100 hPa; each column is offset by up to a
/// few hPa so columns are not identical.
pub fn create_pressure_field(nz: usize, ny: usize, nx: usize) -> Vec<f64> {
    let levels = pressure_levels_hpa(nz, 1000.0, 100.0);
    let mut data = Vec::with_capacity(nz * ny * nx);
    for level in &levels {
        for j in 0..ny {
            for i in 0..nx {
                let offset = ((i + 2 * j) % 7) as f64 - 3.0;
                data.push((level + offset) * 100.0);
            }
        }
    }
    data
}

/// Creates a temperature field (K) consistent with a pressure field (Pa).
///
/// Uses the standard-atmosphere relation `T = 288.15 * (p / 1013.25 hPa)^0.1903`.
pub fn create_temperature_field(pressure_pa: &[f64]) -> Vec<f64> {
    pressure_pa
        .iter()
        .map(|&p| 288.15 * (p / 101_325.0).powf(0.1903))
        .collect()
}

/// Creates a deterministic mixing ratio field in `[0, max)` kg/kg.
///
/// Roughly a quarter of the cells are exactly zero, so the grid mixes clear
/// and cloudy cells.
pub fn create_mixing_ratio_field(len: usize, max: f64, seed: u32) -> Vec<f64> {
    (0..len)
        .map(|index| {
            let hash = simple_hash(index as u32, 0, seed);
            if hash % 4 == 0 {
                0.0
            } else {
                (hash % 10_000) as f64 / 10_000.0 * max
            }
        })
        .collect()
}

/// Creates a field filled with a constant value.
pub fn create_constant_field(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
