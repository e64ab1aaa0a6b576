use crate::domain::catalog::MetricCatalog;
use crate::domain::errors::{PipelineError, StatisticsError};
use crate::domain::experiment::ExperimentKey;
use crate::domain::samples::SampleMatrix;
use crate::domain::statistics::{RunStats, StatsIndex, StatsIndexBuilder, StatsRecord};
use rayon::prelude::*;
use tracing::{debug, info};

/// Computes per-metric statistics of loaded runs and builds the stats index.
///
/// Matrix column `i` holds the values of the catalog's `i`-th metric, which
/// is how the sample loader lays them out.
pub struct StatsAggregator<'a> {
    catalog: &'a MetricCatalog,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(catalog: &'a MetricCatalog) -> Self {
        Self { catalog }
    }

    /// Statistics of every catalog metric for one run.
    pub fn aggregate(
        &self,
        key: &ExperimentKey,
        matrix: &SampleMatrix,
    ) -> Result<RunStats, StatisticsError> {
        let mut run = RunStats::new();
        for (column, metric) in self.catalog.iter().enumerate() {
            let samples = matrix
                .column(column)
                .ok_or_else(|| StatisticsError::ColumnOutOfRange {
                    metric: metric.label.clone(),
                    column,
                    width: matrix.width(),
                })?;
            let record = StatsRecord::from_samples(&metric.label, &samples)?;
            run.insert(&metric.label, record);
        }
        debug!("Aggregated {} metrics over {} trials for {}", run.len(), matrix.trials(), key);
        Ok(run)
    }

    /// Aggregates every run and merges them into a fresh index.
    ///
    /// Runs are independent; with `parallel` they are computed on the rayon
    /// pool. The index is only assembled once every run succeeded, so a
    /// failure never leaves a partially populated index behind.
    pub fn aggregate_all(
        &self,
        runs: &[(ExperimentKey, SampleMatrix)],
        parallel: bool,
    ) -> Result<StatsIndex, PipelineError> {
        let compute = |(key, matrix): &(ExperimentKey, SampleMatrix)| {
            self.aggregate(key, matrix)
                .map(|run| (key.clone(), run))
                .map_err(|source| PipelineError::Statistics {
                    key: key.clone(),
                    source,
                })
        };

        let computed: Vec<(ExperimentKey, RunStats)> = if parallel {
            runs.par_iter().map(compute).collect::<Result<_, _>>()?
        } else {
            runs.iter().map(compute).collect::<Result<_, _>>()?
        };

        let mut builder = StatsIndexBuilder::new();
        for (key, run) in computed {
            builder.insert(key, run)?;
        }
        let index = builder.finish();
        info!(
            "Aggregation pass complete: {} runs x {} metrics",
            index.len(),
            self.catalog.len()
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::IndexError;

    fn catalog() -> MetricCatalog {
        let mut catalog = MetricCatalog::new();
        catalog.define("ctime", "Time [s]", "", 1, true).unwrap();
        catalog.define("ipc", "IPC", "", 15, false).unwrap();
        catalog
    }

    fn key(config: &str) -> ExperimentKey {
        ExperimentKey::new("w", 1, 1, config).unwrap()
    }

    #[test]
    fn test_aggregate_covers_every_metric() {
        let catalog = catalog();
        let matrix = SampleMatrix::from_rows(2, vec![vec![10.0, 1.0], vec![12.0, 2.0]]).unwrap();
        let run = StatsAggregator::new(&catalog).aggregate(&key("BBQ"), &matrix).unwrap();

        assert_eq!(run.len(), 2);
        assert_eq!(run.get("ctime").unwrap().mean, 11.0);
        assert_eq!(run.get("ipc").unwrap().n, 2);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let catalog = catalog();
        let matrix = SampleMatrix::from_rows(
            2,
            vec![vec![1.1, 0.3], vec![2.7, 0.9], vec![3.3, 0.1], vec![0.4, 0.7]],
        )
        .unwrap();
        let aggregator = StatsAggregator::new(&catalog);
        let first = aggregator.aggregate(&key("BBQ"), &matrix).unwrap();
        let second = aggregator.aggregate(&key("BBQ"), &matrix).unwrap();

        for (label, rec) in first.iter() {
            let other = second.get(label).unwrap();
            assert_eq!(rec.mean.to_bits(), other.mean.to_bits());
            assert_eq!(rec.stddev.to_bits(), other.stddev.to_bits());
            assert_eq!(rec.ci99.to_bits(), other.ci99.to_bits());
        }
    }

    #[test]
    fn test_narrow_matrix_is_rejected() {
        let catalog = catalog();
        let matrix = SampleMatrix::from_rows(1, vec![vec![10.0]]).unwrap();
        let err = StatsAggregator::new(&catalog)
            .aggregate(&key("BBQ"), &matrix)
            .unwrap_err();
        assert_eq!(
            err,
            StatisticsError::ColumnOutOfRange {
                metric: "ipc".to_string(),
                column: 1,
                width: 1
            }
        );
    }

    #[test]
    fn test_empty_matrix_aborts_whole_pass() {
        let catalog = catalog();
        let good = SampleMatrix::from_rows(2, vec![vec![1.0, 1.0]]).unwrap();
        let runs = vec![(key("NOBBQ"), good), (key("BBQ"), SampleMatrix::new(2))];

        let err = StatsAggregator::new(&catalog)
            .aggregate_all(&runs, false)
            .unwrap_err();
        match err {
            PipelineError::Statistics { key: failed, source } => {
                assert_eq!(failed, key("BBQ"));
                assert!(matches!(source, StatisticsError::EmptySample { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = catalog();
        let runs: Vec<_> = (1..=6)
            .map(|i| {
                let k = ExperimentKey::new("w", i, 1, "BBQ").unwrap();
                let m = SampleMatrix::from_rows(
                    2,
                    vec![vec![i as f64, 0.5], vec![i as f64 * 2.0, 0.25]],
                )
                .unwrap();
                (k, m)
            })
            .collect();
        let aggregator = StatsAggregator::new(&catalog);

        let sequential = aggregator.aggregate_all(&runs, false).unwrap();
        let parallel = aggregator.aggregate_all(&runs, true).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), 6);
    }

    #[test]
    fn test_duplicate_run_is_rejected() {
        let catalog = catalog();
        let m = SampleMatrix::from_rows(2, vec![vec![1.0, 1.0]]).unwrap();
        let runs = vec![(key("BBQ"), m.clone()), (key("BBQ"), m)];

        let err = StatsAggregator::new(&catalog)
            .aggregate_all(&runs, false)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Index(IndexError::DuplicateKey { .. })
        ));
    }
}
