use crate::application::aggregator::StatsAggregator;
use crate::application::comparison_builder::ComparisonBuilder;
use crate::domain::catalog::MetricCatalog;
use crate::domain::comparison::ComparisonReport;
use crate::domain::errors::{ConfigurationError, PipelineError};
use crate::domain::experiment::{ConfigurationSet, ExperimentGrid, ExperimentKey};
use crate::domain::ports::SampleSource;
use crate::domain::samples::SampleMatrix;
use crate::domain::statistics::StatsIndex;
use rayon::prelude::*;
use tracing::{error, info};

/// Result of a full pass: the index and the comparison derived from it.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub index: StatsIndex,
    pub report: ComparisonReport,
}

/// Drives one batch pass: load every run, aggregate, then compare.
///
/// Any load or aggregation failure aborts the pass before comparison, since a
/// partially populated index would silently drop runs from the comparison.
pub struct BenchmarkEngine<'a> {
    source: &'a dyn SampleSource,
    catalog: &'a MetricCatalog,
    configurations: &'a ConfigurationSet,
    parallel: bool,
}

impl<'a> BenchmarkEngine<'a> {
    pub fn new(
        source: &'a dyn SampleSource,
        catalog: &'a MetricCatalog,
        configurations: &'a ConfigurationSet,
    ) -> Self {
        Self {
            source,
            catalog,
            configurations,
            parallel: false,
        }
    }

    /// Load and aggregate runs on the rayon pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn load(
        &self,
        keys: &[ExperimentKey],
    ) -> Result<Vec<(ExperimentKey, SampleMatrix)>, PipelineError> {
        let columns = self.catalog.all_columns();
        let load_one = |key: &ExperimentKey| {
            self.source
                .load(key, &columns)
                .map(|matrix| (key.clone(), matrix))
                .map_err(|source| {
                    error!("Failed to load {}: {}", key, source);
                    PipelineError::Load {
                        key: key.clone(),
                        source,
                    }
                })
        };

        if self.parallel {
            keys.par_iter().map(load_one).collect()
        } else {
            keys.iter().map(load_one).collect()
        }
    }

    pub fn aggregate(&self, keys: &[ExperimentKey]) -> Result<StatsIndex, PipelineError> {
        let runs = self.load(keys)?;
        info!("Loaded {} runs", runs.len());
        StatsAggregator::new(self.catalog).aggregate_all(&runs, self.parallel)
    }

    /// The declared configuration named `baseline`, or the first one when `None`.
    fn baseline_name<'b>(
        &'b self,
        baseline: Option<&'b str>,
    ) -> Result<&'b str, ConfigurationError> {
        match baseline {
            None => Ok(self.configurations.baseline().name.as_str()),
            Some(name) => self
                .configurations
                .get(name)
                .map(|c| c.name.as_str())
                .ok_or_else(|| ConfigurationError::UnknownConfiguration {
                    name: name.to_string(),
                }),
        }
    }

    /// Compares against `baseline`, or the first declared configuration when `None`.
    pub fn compare(
        &self,
        index: &StatsIndex,
        baseline: Option<&str>,
    ) -> Result<ComparisonReport, ConfigurationError> {
        let baseline = self.baseline_name(baseline)?;
        ComparisonBuilder::new(self.catalog, self.configurations).compare_all(index, baseline)
    }

    pub fn run(
        &self,
        grid: &ExperimentGrid,
        baseline: Option<&str>,
    ) -> Result<EngineOutcome, PipelineError> {
        let baseline = self.baseline_name(baseline)?;
        let keys = grid.keys(self.configurations)?;
        info!(
            "Starting pass: {} workloads, {} runs, {} metrics",
            grid.workloads.len(),
            keys.len(),
            self.catalog.len()
        );
        let index = self.aggregate(&keys)?;
        let report = self.compare(&index, Some(baseline))?;
        Ok(EngineOutcome { index, report })
    }
}
