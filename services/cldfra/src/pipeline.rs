//! Per-file processing: read, compute, reduce, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cloud_fraction::{
    band_max, compute_cloud_fraction, CloudConstants, EmptyBandPolicy, Field2D,
    MicrophysicsScheme, PressureBand,
};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};
use wrf_netcdf::{write_cloud_fraction, WrfFile, WriteOptions};

use crate::config::CldfraConfig;

/// Settings shared by every file of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub constants: CloudConstants,
    pub band: PressureBand,
    pub empty_band: EmptyBandPolicy,
    /// Scheme to use instead of the file's `MP_PHYSICS`.
    pub scheme: Option<MicrophysicsScheme>,
    pub write: WriteOptions,
    /// Compute but do not write.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(config: &CldfraConfig, dry_run: bool) -> Self {
        Self {
            constants: config.constants,
            band: config.band,
            empty_band: config.empty_band,
            scheme: config.scheme_override(),
            write: WriteOptions {
                overwrite: config.overwrite,
            },
            dry_run,
        }
    }
}

/// Outcome of a successfully processed file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub scheme: MicrophysicsScheme,
    pub records: usize,
    /// Columns per record.
    pub columns: usize,
    /// NaN cells across all records (empty band with the `nan` policy).
    pub nan_cells: usize,
    /// Largest finite band maximum, if any.
    pub max_fraction: Option<f64>,
    pub written: bool,
}

/// Results of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<FileReport>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compute the band-max cloud fraction of every `Time` record of one file
/// and, unless this is a dry run, write it back as `cldfra`.
///
/// Every record is computed before the file is reopened for writing, so a
/// failure leaves the file untouched.
pub fn process_file(path: &Path, options: &RunOptions) -> Result<FileReport> {
    let (scheme, records) = {
        let wrf = WrfFile::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let scheme = match options.scheme {
            Some(scheme) => scheme,
            None => wrf
                .microphysics()
                .with_context(|| format!("No microphysics scheme in {}", path.display()))?,
        };

        if !scheme.is_recognized() {
            warn!(
                file = %path.display(),
                scheme = scheme.id(),
                "Unrecognized microphysics scheme, cloud fraction set to zero"
            );
        }
        debug!(file = %path.display(), scheme = %scheme, times = wrf.time_count(), "Processing");

        let records = (0..wrf.time_count())
            .map(|time| compute_record(&wrf, time, scheme, options))
            .collect::<Result<Vec<_>>>()?;
        (scheme, records)
    };

    if !options.dry_run {
        write_cloud_fraction(path, &records, options.write)
            .with_context(|| format!("Failed to write cldfra to {}", path.display()))?;
    }

    let columns = records.first().map(|r| r.data().len()).unwrap_or(0);
    let values = records.iter().flat_map(|r| r.data().iter().copied());
    let nan_cells = values.clone().filter(|v| v.is_nan()).count();
    let max_fraction = values.filter(|v| !v.is_nan()).reduce(f64::max);

    Ok(FileReport {
        path: path.to_path_buf(),
        scheme,
        records: records.len(),
        columns,
        nan_cells,
        max_fraction,
        written: !options.dry_run,
    })
}

fn compute_record(
    wrf: &WrfFile,
    time: usize,
    scheme: MicrophysicsScheme,
    options: &RunOptions,
) -> Result<Field2D> {
    let fields = wrf
        .read_fields(time)
        .with_context(|| format!("Failed to read record {}", time))?;
    let fraction = compute_cloud_fraction(scheme, &fields, &options.constants)
        .with_context(|| format!("Cloud fraction failed for record {}", time))?;
    let reduced = band_max(
        &fraction,
        &fields.pressure_hpa(),
        options.band,
        options.empty_band,
    )
    .with_context(|| format!("Band maximum failed for record {}", time))?;
    Ok(reduced)
}

/// Process files on a dedicated pool of `jobs` threads.
///
/// A failing file is logged and recorded; the others still run.
pub fn run(files: &[PathBuf], options: &RunOptions, jobs: usize) -> Result<RunSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("cldfra-{}", i))
        .build()
        .context("Failed to build worker pool")?;

    let outcomes: Vec<(PathBuf, Result<FileReport>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), process_file(path, options)))
            .collect()
    });

    let mut summary = RunSummary::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                info!(
                    file = %path.display(),
                    scheme = %report.scheme,
                    records = report.records,
                    nan_cells = report.nan_cells,
                    max_fraction = ?report.max_fraction,
                    written = report.written,
                    "File processed"
                );
                summary.succeeded.push(report);
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(file = %path.display(), error = %message, "File failed");
                summary.failed.push((path, e));
            }
        }
    }

    Ok(summary)
}
