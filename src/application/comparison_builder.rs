use crate::domain::catalog::MetricCatalog;
use crate::domain::comparison::{ComparisonFailure, ComparisonRecord, ComparisonReport};
use crate::domain::errors::ConfigurationError;
use crate::domain::experiment::{ConfigurationSet, ExperimentKey};
use crate::domain::statistics::StatsIndex;
use tracing::{info, warn};

/// Derives baseline-normalized views of a stats index.
///
/// Output order: cell (workload, instances, threads ascending), then catalog
/// order of metrics, then declared order of the non-baseline configurations.
pub struct ComparisonBuilder<'a> {
    catalog: &'a MetricCatalog,
    configurations: &'a ConfigurationSet,
}

impl<'a> ComparisonBuilder<'a> {
    pub fn new(catalog: &'a MetricCatalog, configurations: &'a ConfigurationSet) -> Self {
        Self {
            catalog,
            configurations,
        }
    }

    /// Compares every configuration against `baseline` for every quadruple
    /// present in the index under both configurations.
    ///
    /// A degenerate cell is recorded as a failure and does not stop the pass.
    pub fn compare_all(
        &self,
        index: &StatsIndex,
        baseline: &str,
    ) -> Result<ComparisonReport, ConfigurationError> {
        if self.configurations.get(baseline).is_none() {
            return Err(ConfigurationError::UnknownConfiguration {
                name: baseline.to_string(),
            });
        }

        let mut report = ComparisonReport {
            baseline: baseline.to_string(),
            ..ComparisonReport::default()
        };

        for cell in index.cells() {
            let base_key =
                ExperimentKey::new(cell.workload.as_str(), cell.instances, cell.threads, baseline)?;
            let Some(base_run) = index.get(&base_key) else {
                continue;
            };

            for metric in self.catalog.iter() {
                let Some(base_stats) = base_run.get(&metric.label) else {
                    continue;
                };

                for other in self.configurations.others(baseline) {
                    let other_key = base_key.with_configuration(&other.name);
                    let Some(other_stats) = index.record(&other_key, &metric.label) else {
                        continue;
                    };

                    match ComparisonRecord::compute(
                        &cell,
                        metric,
                        baseline,
                        base_stats,
                        &other.name,
                        other_stats,
                    ) {
                        Ok(record) => report.records.push(record),
                        Err(error) => {
                            warn!(
                                "Comparison {} [{}] vs {} skipped: {}",
                                cell, metric.label, other.name, error
                            );
                            report.failures.push(ComparisonFailure {
                                workload: cell.workload.clone(),
                                instances: cell.instances,
                                threads: cell.threads,
                                metric: metric.label.clone(),
                                configuration: other.name.clone(),
                                error,
                            });
                        }
                    }
                }
            }
        }

        info!(
            "Comparison pass against {}: {} records, {} failures",
            baseline,
            report.records.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ComparisonError;
    use crate::domain::experiment::Configuration;
    use crate::domain::statistics::{RunStats, StatsIndexBuilder, StatsRecord};

    fn catalog() -> MetricCatalog {
        let mut catalog = MetricCatalog::new();
        catalog.define("ctime", "Time [s]", "", 1, true).unwrap();
        catalog.define("ipc", "IPC", "", 15, false).unwrap();
        catalog
    }

    fn configurations() -> ConfigurationSet {
        ConfigurationSet::new(vec![
            Configuration::new("NOBBQ", "Unmanaged", "0.2"),
            Configuration::new("BBQ", "BBQ Managed", "0.6"),
            Configuration::new("BBQ-RT", "BBQ Real-Time", "0.8"),
        ])
        .unwrap()
    }

    fn run(ctime: &[f64], ipc: &[f64]) -> RunStats {
        let mut run = RunStats::new();
        run.insert("ctime", StatsRecord::from_samples("ctime", ctime).unwrap());
        run.insert("ipc", StatsRecord::from_samples("ipc", ipc).unwrap());
        run
    }

    fn key(instances: u32, config: &str) -> ExperimentKey {
        ExperimentKey::new("w", instances, 4, config).unwrap()
    }

    #[test]
    fn test_output_order() {
        let mut builder = StatsIndexBuilder::new();
        for instances in [3, 1] {
            builder.insert(key(instances, "BBQ-RT"), run(&[9.0], &[1.1])).unwrap();
            builder.insert(key(instances, "NOBBQ"), run(&[10.0], &[1.0])).unwrap();
            builder.insert(key(instances, "BBQ"), run(&[8.0], &[1.2])).unwrap();
        }
        let index = builder.finish();
        let (catalog, configs) = (catalog(), configurations());

        let report = ComparisonBuilder::new(&catalog, &configs)
            .compare_all(&index, "NOBBQ")
            .unwrap();
        let order: Vec<(u32, &str, &str)> = report
            .records
            .iter()
            .map(|r| (r.instances, r.metric.as_str(), r.configuration.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, "ctime", "BBQ"),
                (1, "ctime", "BBQ-RT"),
                (1, "ipc", "BBQ"),
                (1, "ipc", "BBQ-RT"),
                (3, "ctime", "BBQ"),
                (3, "ctime", "BBQ-RT"),
                (3, "ipc", "BBQ"),
                (3, "ipc", "BBQ-RT"),
            ]
        );
        assert!(report.is_complete());
    }

    #[test]
    fn test_zero_baseline_fails_only_its_cell() {
        let mut builder = StatsIndexBuilder::new();
        builder.insert(key(1, "NOBBQ"), run(&[10.0], &[0.0, 0.0])).unwrap();
        builder.insert(key(1, "BBQ"), run(&[8.0], &[1.0])).unwrap();
        let index = builder.finish();
        let (catalog, configs) = (catalog(), configurations());

        let report = ComparisonBuilder::new(&catalog, &configs)
            .compare_all(&index, "NOBBQ")
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].metric, "ctime");
        assert!((report.records[0].relative_improvement - 0.2).abs() < 1e-12);

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.metric, "ipc");
        assert_eq!(failure.configuration, "BBQ");
        assert!(matches!(
            failure.error,
            ComparisonError::DegenerateBaseline { .. }
        ));
    }

    #[test]
    fn test_missing_counterpart_is_skipped() {
        let mut builder = StatsIndexBuilder::new();
        builder.insert(key(1, "NOBBQ"), run(&[10.0], &[1.0])).unwrap();
        builder.insert(key(3, "BBQ"), run(&[8.0], &[1.0])).unwrap();
        let index = builder.finish();
        let (catalog, configs) = (catalog(), configurations());

        let report = ComparisonBuilder::new(&catalog, &configs)
            .compare_all(&index, "NOBBQ")
            .unwrap();
        assert!(report.records.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_unknown_baseline() {
        let index = StatsIndexBuilder::new().finish();
        let (catalog, configs) = (catalog(), configurations());
        let err = ComparisonBuilder::new(&catalog, &configs)
            .compare_all(&index, "KVM")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownConfiguration {
                name: "KVM".to_string()
            }
        );
    }

    #[test]
    fn test_alternate_baseline_flips_roles() {
        let mut builder = StatsIndexBuilder::new();
        builder.insert(key(1, "NOBBQ"), run(&[10.0], &[1.0])).unwrap();
        builder.insert(key(1, "BBQ"), run(&[8.0], &[1.0])).unwrap();
        let index = builder.finish();
        let (catalog, configs) = (catalog(), configurations());

        let report = ComparisonBuilder::new(&catalog, &configs)
            .compare_all(&index, "BBQ")
            .unwrap();
        let ctime = report.records.iter().find(|r| r.metric == "ctime").unwrap();
        assert_eq!(ctime.configuration, "NOBBQ");
        assert!(ctime.relative_improvement < 0.0);
    }
}
