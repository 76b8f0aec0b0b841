//! WRF cloud fraction post-processor.
//!
//! For every input `wrfout` file, computes the diagnostic cloud fraction of
//! each Time record, reduces it to the maximum over the 350-400 hPa band and
//! writes the result back to the same file as `cldfra`.

mod config;
mod inputs;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cloud_fraction::EmptyBandPolicy;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::CldfraConfig;
use pipeline::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "cldfra")]
#[command(about = "Add 350-400 hPa maximum cloud fraction to WRF output files")]
struct Args {
    /// wrfout files to process
    files: Vec<PathBuf>,

    /// File listing additional wrfout paths, one per line
    #[arg(short = 'l', long)]
    file_list: Option<PathBuf>,

    /// Configuration file path (YAML)
    #[arg(short, long, env = "CLDFRA_CONFIG")]
    config: Option<PathBuf>,

    /// Number of worker threads (default: available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Microphysics scheme id, overriding MP_PHYSICS from the file
    #[arg(long)]
    scheme: Option<i32>,

    /// Lower pressure bound of the band (hPa, exclusive)
    #[arg(long)]
    band_low: Option<f64>,

    /// Upper pressure bound of the band (hPa, exclusive)
    #[arg(long)]
    band_high: Option<f64>,

    /// Columns with no level in the band: fail, nan or zero
    #[arg(long, value_parser = parse_empty_band)]
    empty_band: Option<EmptyBandPolicy>,

    /// Replace an existing cldfra variable
    #[arg(long)]
    overwrite: bool,

    /// Compute but do not write
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_empty_band(s: &str) -> std::result::Result<EmptyBandPolicy, String> {
    EmptyBandPolicy::parse(s).ok_or_else(|| format!("expected fail, nan or zero, got '{}'", s))
}

fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = load_config(&args)?;
    let files = inputs::collect_inputs(&args.files, args.file_list.as_deref())?;
    if files.is_empty() {
        bail!("No input files given");
    }

    info!(
        files = files.len(),
        jobs = config.jobs,
        band_low = config.band.low,
        band_high = config.band.high,
        empty_band = %config.empty_band,
        scheme = ?config.scheme,
        dry_run = args.dry_run,
        "Starting cloud fraction run"
    );

    let options = RunOptions::from_config(&config, args.dry_run);
    let summary = pipeline::run(&files, &options, config.jobs)?;

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "Run complete"
    );

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

/// Defaults, then the YAML file, then the environment, then flags.
fn load_config(args: &Args) -> Result<CldfraConfig> {
    let mut config = match &args.config {
        Some(path) => CldfraConfig::from_yaml(path)?,
        None => CldfraConfig::default(),
    };
    config.apply_env();
    apply_args(&mut config, args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_args(config: &mut CldfraConfig, args: &Args) {
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(scheme) = args.scheme {
        config.scheme = Some(scheme);
    }
    if let Some(low) = args.band_low {
        config.band.low = low;
    }
    if let Some(high) = args.band_high {
        config.band.high = high;
    }
    if let Some(policy) = args.empty_band {
        config.empty_band = policy;
    }
    if args.overwrite {
        config.overwrite = true;
    }
}
