use crate::domain::experiment::ExperimentKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the metric catalog or the configuration list.
/// These abort the run before any sample is aggregated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Metric '{label}' is already registered")]
    DuplicateMetric { label: String },

    #[error("Unknown metric: {label}")]
    UnknownMetric { label: String },

    #[error("Malformed configuration list: {reason}")]
    MalformedConfigurations { reason: String },

    #[error("Unknown configuration: {name}")]
    UnknownConfiguration { name: String },

    #[error("Invalid experiment key: {reason}")]
    InvalidKey { reason: String },
}

/// Errors related to reading one run's raw measurement file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Sample file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row {line} in {}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Sample file {} contains no trial rows", path.display())]
    EmptyFile { path: PathBuf },
}

/// Errors related to descriptive statistics
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("Empty sample for metric '{metric}'")]
    EmptySample { metric: String },

    #[error("Metric '{metric}' maps to matrix column {column} but rows hold {width} values")]
    ColumnOutOfRange {
        metric: String,
        column: usize,
        width: usize,
    },
}

/// Errors for a single comparison cell. Other cells of the same pass are unaffected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Baseline '{baseline}' has zero mean for metric '{metric}', normalization undefined")]
    DegenerateBaseline { baseline: String, metric: String },
}

/// Errors raised while populating the stats index
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Statistics for {key} were already recorded")]
    DuplicateKey { key: ExperimentKey },
}

/// Errors raised while extracting plot series. A missing run is never
/// rendered as zero.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlotDataError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("No statistics recorded for {key}")]
    MissingRun { key: ExperimentKey },

    #[error("Run {key} has no statistics for metric '{metric}'")]
    MissingMetric { key: ExperimentKey, metric: String },
}

/// Aggregation-time failure. Any of these aborts the whole run since a
/// partial index would corrupt the cross-configuration comparisons.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Loading samples for {key} failed: {source}")]
    Load {
        key: ExperimentKey,
        #[source]
        source: LoadError,
    },

    #[error("Aggregating {key} failed: {source}")]
    Statistics {
        key: ExperimentKey,
        #[source]
        source: StatisticsError,
    },

    #[error(transparent)]
    Index(#[from] IndexError),
}
