//! Series handed to the plotting collaborator.
//!
//! The renderer only sees numbers and display labels. Raw sample matrices
//! never leave the aggregation stage.

use crate::domain::catalog::MetricCatalog;
use crate::domain::comparison::{ComparisonRecord, ComparisonReport};
use crate::domain::errors::{ConfigurationError, PlotDataError};
use crate::domain::experiment::{ConfigurationSet, ExperimentKey};
use crate::domain::statistics::{StatsIndex, StatsRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub instances: u32,
    pub stats: StatsRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationSeries {
    pub configuration: String,
    pub label: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

/// One metric of one workload at a fixed thread count, across the instance axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSeries {
    pub workload: String,
    pub threads: u32,
    pub metric: String,
    pub display_name: String,
    pub description: String,
    pub series: Vec<ConfigurationSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub display_name: String,
    pub configuration_label: String,
    pub color: String,
    #[serde(flatten)]
    pub record: ComparisonRecord,
}

/// Every metric and non-baseline configuration of one cell, normalized to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub workload: String,
    pub instances: u32,
    pub threads: u32,
    pub baseline: String,
    pub entries: Vec<ComparisonEntry>,
}

pub struct PlotDataBuilder<'a> {
    catalog: &'a MetricCatalog,
    configurations: &'a ConfigurationSet,
}

impl<'a> PlotDataBuilder<'a> {
    pub fn new(catalog: &'a MetricCatalog, configurations: &'a ConfigurationSet) -> Self {
        Self {
            catalog,
            configurations,
        }
    }

    /// Statistics of `metric` for every configuration (declared order) and
    /// every entry of `instances`.
    pub fn instance_series(
        &self,
        index: &StatsIndex,
        workload: &str,
        metric: &str,
        threads: u32,
        instances: &[u32],
    ) -> Result<InstanceSeries, PlotDataError> {
        let definition = self.catalog.lookup(metric)?;

        let mut series = Vec::with_capacity(self.configurations.len());
        for configuration in self.configurations.iter() {
            let mut points = Vec::with_capacity(instances.len());
            for &count in instances {
                let key =
                    ExperimentKey::new(workload, count, threads, configuration.name.as_str())?;
                let run = index
                    .get(&key)
                    .ok_or_else(|| PlotDataError::MissingRun { key: key.clone() })?;
                let stats = run
                    .get(metric)
                    .ok_or_else(|| PlotDataError::MissingMetric {
                        key: key.clone(),
                        metric: metric.to_string(),
                    })?;
                points.push(SeriesPoint {
                    instances: count,
                    stats: *stats,
                });
            }
            series.push(ConfigurationSeries {
                configuration: configuration.name.clone(),
                label: configuration.label.clone(),
                color: configuration.color.clone(),
                points,
            });
        }

        Ok(InstanceSeries {
            workload: workload.to_string(),
            threads,
            metric: definition.label.clone(),
            display_name: definition.display_name.clone(),
            description: definition.description.clone(),
            series,
        })
    }

    /// Comparison records of one `(workload, instances, threads)` triple, in report order.
    pub fn comparison_series(
        &self,
        report: &ComparisonReport,
        workload: &str,
        instances: u32,
        threads: u32,
    ) -> Result<ComparisonSeries, PlotDataError> {
        let mut entries = Vec::new();
        for record in report.for_cell(workload, instances, threads) {
            let definition = self.catalog.lookup(&record.metric)?;
            let configuration = self.configurations.get(&record.configuration).ok_or_else(|| {
                ConfigurationError::UnknownConfiguration {
                    name: record.configuration.clone(),
                }
            })?;
            entries.push(ComparisonEntry {
                display_name: definition.display_name.clone(),
                configuration_label: configuration.label.clone(),
                color: configuration.color.clone(),
                record: record.clone(),
            });
        }

        Ok(ComparisonSeries {
            workload: workload.to_string(),
            instances,
            threads,
            baseline: report.baseline.clone(),
            entries,
        })
    }
}
