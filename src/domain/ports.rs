use crate::domain::errors::LoadError;
use crate::domain::experiment::ExperimentKey;
use crate::domain::samples::SampleMatrix;

/// Provides the raw measurements of one run.
///
/// `columns` is the catalog's column order; the returned matrix holds one
/// value per entry, in that order.
pub trait SampleSource: Send + Sync {
    fn load(&self, key: &ExperimentKey, columns: &[usize]) -> Result<SampleMatrix, LoadError>;
}
