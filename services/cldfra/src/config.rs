//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `CLDFRA_*` environment variables, then command-line flags.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use cloud_fraction::{CloudConstants, EmptyBandPolicy, MicrophysicsScheme, PressureBand};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level configuration of a `cldfra` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CldfraConfig {
    /// Pressure band (hPa) reduced to a single level.
    pub band: PressureBand,

    /// Behaviour for columns with no level inside the band.
    pub empty_band: EmptyBandPolicy,

    /// Number of worker threads.
    pub jobs: usize,

    /// Microphysics scheme id overriding the file's `MP_PHYSICS`.
    pub scheme: Option<i32>,

    /// Replace an existing `cldfra` variable.
    pub overwrite: bool,

    /// Kernel constants.
    pub constants: CloudConstants,
}

impl Default for CldfraConfig {
    fn default() -> Self {
        Self {
            band: PressureBand::default(),
            empty_band: EmptyBandPolicy::default(),
            jobs: default_jobs(),
            scheme: None,
            overwrite: false,
            constants: CloudConstants::default(),
        }
    }
}

impl CldfraConfig {
    /// Load configuration from a YAML file on top of the defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply `CLDFRA_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| env::var(name).ok());
    }

    /// Apply variables from an arbitrary lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CLDFRA_BAND_LOW") {
            match val.trim().parse() {
                Ok(low) => self.band.low = low,
                Err(_) => warn!(variable = "CLDFRA_BAND_LOW", value = %val, "Ignoring invalid value"),
            }
        }

        if let Some(val) = lookup("CLDFRA_BAND_HIGH") {
            match val.trim().parse() {
                Ok(high) => self.band.high = high,
                Err(_) => warn!(variable = "CLDFRA_BAND_HIGH", value = %val, "Ignoring invalid value"),
            }
        }

        if let Some(val) = lookup("CLDFRA_EMPTY_BAND") {
            match EmptyBandPolicy::parse(&val) {
                Some(policy) => self.empty_band = policy,
                None => warn!(variable = "CLDFRA_EMPTY_BAND", value = %val, "Ignoring invalid value"),
            }
        }

        if let Some(val) = lookup("CLDFRA_JOBS") {
            match val.trim().parse() {
                Ok(jobs) => self.jobs = jobs,
                Err(_) => warn!(variable = "CLDFRA_JOBS", value = %val, "Ignoring invalid value"),
            }
        }

        if let Some(val) = lookup("CLDFRA_SCHEME") {
            match val.trim().parse() {
                Ok(id) => self.scheme = Some(id),
                Err(_) => warn!(variable = "CLDFRA_SCHEME", value = %val, "Ignoring invalid value"),
            }
        }

        if let Some(val) = lookup("CLDFRA_OVERWRITE") {
            self.overwrite = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.band
            .validate()
            .context("Invalid pressure band")?;

        if self.jobs == 0 {
            bail!("jobs must be > 0");
        }

        Ok(())
    }

    /// Scheme override, if configured.
    pub fn scheme_override(&self) -> Option<MicrophysicsScheme> {
        self.scheme.map(MicrophysicsScheme::from_id)
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_utils::temp_test_dir_with_prefix;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CldfraConfig::default();
        assert_eq!(config.band, PressureBand { low: 350.0, high: 400.0 });
        assert_eq!(config.empty_band, EmptyBandPolicy::Fail);
        assert!(config.jobs >= 1);
        assert_eq!(config.scheme, None);
        assert!(!config.overwrite);
        assert_eq!(config.constants, CloudConstants::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CldfraConfig::default();
        config.jobs = 0;
        assert!(config.validate().is_err());

        config = CldfraConfig::default();
        config.band = PressureBand { low: 400.0, high: 350.0 };
        assert!(config.validate().is_err());

        config.band = PressureBand { low: f64::NAN, high: 350.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = temp_test_dir_with_prefix("cldfra_config_");
        let path = dir.path().join("cldfra.yaml");
        fs::write(
            &path,
            "band:\n  low: 300.0\nempty_band: nan\njobs: 3\nconstants:\n  alpha0: 50.0\n",
        )
        .unwrap();

        let config = CldfraConfig::from_yaml(&path).unwrap();
        assert_eq!(config.band, PressureBand { low: 300.0, high: 400.0 });
        assert_eq!(config.empty_band, EmptyBandPolicy::Nan);
        assert_eq!(config.jobs, 3);
        assert_eq!(config.constants.alpha0, 50.0);
        assert_eq!(config.constants.gamma, CloudConstants::default().gamma);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_yaml_errors_name_the_file() {
        let dir = temp_test_dir_with_prefix("cldfra_config_bad_");
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "jobs: [not, a, number]\n").unwrap();

        let err = CldfraConfig::from_yaml(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.yaml"));

        assert!(CldfraConfig::from_yaml(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CldfraConfig::default();
        config.apply_vars(lookup(&[
            ("CLDFRA_BAND_LOW", "300"),
            ("CLDFRA_BAND_HIGH", " 450.5 "),
            ("CLDFRA_EMPTY_BAND", "zero"),
            ("CLDFRA_JOBS", "2"),
            ("CLDFRA_SCHEME", "8"),
            ("CLDFRA_OVERWRITE", "TRUE"),
        ]));

        assert_eq!(config.band, PressureBand { low: 300.0, high: 450.5 });
        assert_eq!(config.empty_band, EmptyBandPolicy::Zero);
        assert_eq!(config.jobs, 2);
        assert_eq!(config.scheme_override(), Some(MicrophysicsScheme::Thompson));
        assert!(config.overwrite);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = CldfraConfig::default();
        let before = config.clone();
        config.apply_vars(lookup(&[
            ("CLDFRA_BAND_LOW", "low"),
            ("CLDFRA_EMPTY_BAND", "maybe"),
            ("CLDFRA_JOBS", "-1"),
            ("CLDFRA_SCHEME", "lin"),
        ]));
        assert_eq!(config, before);
    }
}
