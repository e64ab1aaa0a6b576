use crate::domain::catalog::MetricDefinition;
use crate::domain::errors::ComparisonError;
use crate::domain::experiment::Cell;
use crate::domain::statistics::StatsRecord;
use serde::Serialize;

/// Polarity-corrected relative difference between one configuration and the
/// baseline, for one metric of one cell.
///
/// `relative_improvement > 0` always means "better than baseline", whichever
/// direction the metric improves in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub workload: String,
    pub instances: u32,
    pub threads: u32,
    pub metric: String,
    pub configuration: String,
    /// other.mean / baseline.mean
    pub ratio: f64,
    pub relative_improvement: f64,
    /// other.ci99 normalized by the baseline mean. The baseline's own
    /// uncertainty is not folded in.
    pub relative_error_band: f64,
}

impl ComparisonRecord {
    pub fn compute(
        cell: &Cell,
        metric: &MetricDefinition,
        baseline_name: &str,
        baseline: &StatsRecord,
        configuration: &str,
        other: &StatsRecord,
    ) -> Result<Self, ComparisonError> {
        let factor = baseline.mean;
        if factor == 0.0 {
            return Err(ComparisonError::DegenerateBaseline {
                baseline: baseline_name.to_string(),
                metric: metric.label.clone(),
            });
        }

        let ratio = other.mean / factor;
        let relative_improvement = signed_improvement(ratio, metric.lower_is_better);

        Ok(Self {
            workload: cell.workload.clone(),
            instances: cell.instances,
            threads: cell.threads,
            metric: metric.label.clone(),
            configuration: configuration.to_string(),
            ratio,
            relative_improvement,
            relative_error_band: other.ci99 / factor,
        })
    }

    pub fn cell(&self) -> Cell {
        Cell {
            workload: self.workload.clone(),
            instances: self.instances,
            threads: self.threads,
        }
    }
}

/// Maps a raw ratio onto the shared "improvement" axis.
pub fn signed_improvement(ratio: f64, lower_is_better: bool) -> f64 {
    if lower_is_better {
        1.0 - ratio
    } else {
        ratio - 1.0
    }
}

/// A comparison cell that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonFailure {
    pub workload: String,
    pub instances: u32,
    pub threads: u32,
    pub metric: String,
    pub configuration: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ComparisonError,
}

fn serialize_display<S: serde::Serializer>(
    error: &ComparisonError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a comparison pass: every record that could be computed plus
/// every cell that failed. Callers decide whether a partial result is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub baseline: String,
    pub records: Vec<ComparisonRecord>,
    pub failures: Vec<ComparisonFailure>,
}

impl ComparisonReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records of one `(workload, instances, threads)` triple, in report order.
    pub fn for_cell<'a>(
        &'a self,
        workload: &'a str,
        instances: u32,
        threads: u32,
    ) -> impl Iterator<Item = &'a ComparisonRecord> {
        self.records.iter().filter(move |r| {
            r.workload == workload && r.instances == instances && r.threads == threads
        })
    }

    /// Record with the largest improvement.
    pub fn best(&self) -> Option<&ComparisonRecord> {
        self.records.iter().max_by(|a, b| {
            a.relative_improvement
                .partial_cmp(&b.relative_improvement)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Record with the largest regression.
    pub fn worst(&self) -> Option<&ComparisonRecord> {
        self.records.iter().min_by(|a, b| {
            a.relative_improvement
                .partial_cmp(&b.relative_improvement)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
