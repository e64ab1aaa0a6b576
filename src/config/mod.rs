//! Run configuration for perfcompare.
//!
//! A run is described by a TOML document (dataset location, experiment grid,
//! configuration list, metric table). Every section has defaults matching the
//! PARSEC campaign, and a few environment variables override paths:
//!
//! - `PERFCOMPARE_CONFIG`: TOML file to start from
//! - `PERFCOMPARE_DATA_DIR`: directory holding the sample files
//! - `PERFCOMPARE_OUTPUT_DIR`: directory receiving exports and reports
//! - `PERFCOMPARE_PARALLEL`: `true` to load and aggregate on the rayon pool

pub mod defaults;

use crate::domain::catalog::{MetricCatalog, MetricDefinition};
use crate::domain::errors::ConfigurationError;
use crate::domain::experiment::{Configuration, ConfigurationSet, ExperimentGrid};
use crate::infrastructure::dataset_resolver::{
    DEFAULT_EXTENSION, DEFAULT_PREFIX, DatasetResolver,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Write plot series (CSV/JSON) next to the run report.
    pub export: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("perfcompare_results"),
            export: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub workloads: Vec<String>,
    pub instances: Vec<u32>,
    pub threads: Vec<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            workloads: defaults::WORKLOADS.iter().map(|w| w.to_string()).collect(),
            instances: defaults::INSTANCES.to_vec(),
            threads: defaults::THREADS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parallel: bool,
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
    pub grid: GridConfig,
    pub configurations: Vec<Configuration>,
    pub metrics: Vec<MetricDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: false,
            dataset: DatasetConfig::default(),
            output: OutputConfig::default(),
            grid: GridConfig::default(),
            configurations: defaults::configurations(),
            metrics: defaults::metrics(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Loads `.env`, then builds the config from the process environment.
    ///
    /// An explicit `path` replaces `PERFCOMPARE_CONFIG`; the directory and
    /// parallelism overrides apply either way.
    pub fn from_env(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(path, |key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match (path, lookup("PERFCOMPARE_CONFIG")) {
            (Some(path), _) => Self::load(path)?,
            (None, Some(path)) => Self::load(Path::new(&path))?,
            (None, None) => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("PERFCOMPARE_DATA_DIR") {
            self.dataset.dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PERFCOMPARE_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("PERFCOMPARE_PARALLEL") {
            self.parallel = flag
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid PERFCOMPARE_PARALLEL: {}", flag))?;
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<MetricCatalog, ConfigurationError> {
        MetricCatalog::try_from(self.metrics.clone())
    }

    pub fn configuration_set(&self) -> Result<ConfigurationSet, ConfigurationError> {
        ConfigurationSet::new(self.configurations.clone())
    }

    pub fn grid(&self) -> Result<ExperimentGrid, ConfigurationError> {
        let grid = &self.grid;
        if grid.workloads.is_empty() || grid.instances.is_empty() || grid.threads.is_empty() {
            return Err(ConfigurationError::InvalidKey {
                reason: "grid needs at least one workload, instance count and thread count"
                    .to_string(),
            });
        }
        if grid.instances.contains(&0) || grid.threads.contains(&0) {
            return Err(ConfigurationError::InvalidKey {
                reason: "instance and thread counts must be > 0".to_string(),
            });
        }
        Ok(ExperimentGrid {
            workloads: grid.workloads.clone(),
            instances: grid.instances.clone(),
            threads: grid.threads.clone(),
        })
    }

    pub fn resolver(&self) -> DatasetResolver {
        DatasetResolver::new(
            self.dataset.dir.clone(),
            &self.dataset.prefix,
            &self.dataset.extension,
        )
    }
}
