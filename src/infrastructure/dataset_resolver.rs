use crate::domain::experiment::ExperimentKey;
use std::path::PathBuf;

pub const DEFAULT_PREFIX: &str = "PARSECTest";
pub const DEFAULT_EXTENSION: &str = "dat";

/// Maps runs onto dataset file names:
/// `<dir>/<prefix>-<workload>-N<instances>-T<threads>-<configuration>.<ext>`,
/// with both counts zero-padded to two digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetResolver {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl DatasetResolver {
    pub fn new(dir: impl Into<PathBuf>, prefix: &str, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn file_name(&self, key: &ExperimentKey) -> String {
        format!(
            "{}-{}-N{:02}-T{:02}-{}.{}",
            self.prefix,
            key.workload(),
            key.instances(),
            key.threads(),
            key.configuration(),
            self.extension
        )
    }

    pub fn path_for(&self, key: &ExperimentKey) -> PathBuf {
        self.dir.join(self.file_name(key))
    }
}

impl Default for DatasetResolver {
    fn default() -> Self {
        Self::new(".", DEFAULT_PREFIX, DEFAULT_EXTENSION)
    }
}
