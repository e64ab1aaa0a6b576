use crate::domain::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifies one benchmark run.
///
/// Ordering is workload, instance count, thread count, configuration, which
/// keeps the runs of one `(workload, instances, threads)` cell adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExperimentKey {
    workload: String,
    instances: u32,
    threads: u32,
    configuration: String,
}

impl ExperimentKey {
    pub fn new(
        workload: impl Into<String>,
        instances: u32,
        threads: u32,
        configuration: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let workload = workload.into();
        let configuration = configuration.into();

        if workload.trim().is_empty() {
            return Err(ConfigurationError::InvalidKey {
                reason: "workload name is empty".to_string(),
            });
        }
        if configuration.trim().is_empty() {
            return Err(ConfigurationError::InvalidKey {
                reason: "configuration name is empty".to_string(),
            });
        }
        if instances == 0 {
            return Err(ConfigurationError::InvalidKey {
                reason: format!("instance count must be > 0 ({})", workload),
            });
        }
        if threads == 0 {
            return Err(ConfigurationError::InvalidKey {
                reason: format!("thread count must be > 0 ({})", workload),
            });
        }

        Ok(Self {
            workload,
            instances,
            threads,
            configuration,
        })
    }

    pub fn workload(&self) -> &str {
        &self.workload
    }

    pub fn instances(&self) -> u32 {
        self.instances
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    /// The `(workload, instances, threads)` triple shared by all configurations of a run.
    pub fn cell(&self) -> Cell {
        Cell {
            workload: self.workload.clone(),
            instances: self.instances,
            threads: self.threads,
        }
    }

    /// Same run under a different configuration.
    pub fn with_configuration(&self, configuration: &str) -> Self {
        Self {
            configuration: configuration.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ExperimentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/N{:02}/T{:02}/{}",
            self.workload, self.instances, self.threads, self.configuration
        )
    }
}

/// A `(workload, instances, threads)` triple: the unit a comparison is built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub workload: String,
    pub instances: u32,
    pub threads: u32,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/N{:02}/T{:02}",
            self.workload, self.instances, self.threads
        )
    }
}

/// One of the compared runtime modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub label: String,
    /// Rendering color, passed through to the plotting collaborator as-is.
    pub color: String,
}

impl Configuration {
    pub fn new(name: &str, label: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

/// Ordered, closed set of configurations. The first entry is the
/// normalization baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSet {
    entries: Vec<Configuration>,
}

impl ConfigurationSet {
    pub fn new(entries: Vec<Configuration>) -> Result<Self, ConfigurationError> {
        if entries.is_empty() {
            return Err(ConfigurationError::MalformedConfigurations {
                reason: "at least one configuration is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(ConfigurationError::MalformedConfigurations {
                    reason: "configuration name is empty".to_string(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigurationError::MalformedConfigurations {
                    reason: format!("configuration '{}' is listed twice", entry.name),
                });
            }
        }

        Ok(Self { entries })
    }

    /// The designated baseline (first declared entry).
    pub fn baseline(&self) -> &Configuration {
        &self.entries[0]
    }

    pub fn get(&self, name: &str) -> Option<&Configuration> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.entries.iter()
    }

    /// Every configuration except `baseline`, in declared order.
    pub fn others<'a>(&'a self, baseline: &'a str) -> impl Iterator<Item = &'a Configuration> {
        self.entries.iter().filter(move |c| c.name != baseline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The dimensions of a measurement campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentGrid {
    pub workloads: Vec<String>,
    pub instances: Vec<u32>,
    pub threads: Vec<u32>,
}

impl ExperimentGrid {
    /// Enumerates every run of the grid: workload, then threads, then
    /// configuration, then instance count.
    pub fn keys(
        &self,
        configurations: &ConfigurationSet,
    ) -> Result<Vec<ExperimentKey>, ConfigurationError> {
        let mut keys = Vec::with_capacity(
            self.workloads.len() * self.threads.len() * self.instances.len() * configurations.len(),
        );
        for workload in &self.workloads {
            for &threads in &self.threads {
                for configuration in configurations.iter() {
                    for &instances in &self.instances {
                        keys.push(ExperimentKey::new(
                            workload.as_str(),
                            instances,
                            threads,
                            configuration.name.as_str(),
                        )?);
                    }
                }
            }
        }
        Ok(keys)
    }
}
