use crate::domain::errors::IndexError;
use crate::domain::experiment::{Cell, ExperimentKey};
use crate::domain::statistics::record::StatsRecord;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-metric statistics of one run, keyed by metric label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    records: HashMap<String, StatsRecord>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: &str, record: StatsRecord) -> Option<StatsRecord> {
        self.records.insert(metric.to_string(), record)
    }

    pub fn get(&self, metric: &str) -> Option<&StatsRecord> {
        self.records.get(metric)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatsRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, StatsRecord)> for RunStats {
    fn from_iter<I: IntoIterator<Item = (String, StatsRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Write phase of a [`StatsIndex`].
///
/// Entries are only created through `get_or_init` or `insert`; reading never
/// creates one.
#[derive(Debug, Default)]
pub struct StatsIndexBuilder {
    runs: BTreeMap<ExperimentKey, RunStats>,
}

impl StatsIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable slot for `key`, created empty if absent.
    pub fn get_or_init(&mut self, key: ExperimentKey) -> &mut RunStats {
        self.runs.entry(key).or_default()
    }

    /// Records a complete run. Each key may be written once.
    pub fn insert(&mut self, key: ExperimentKey, run: RunStats) -> Result<(), IndexError> {
        match self.runs.entry(key) {
            Entry::Occupied(slot) => Err(IndexError::DuplicateKey {
                key: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(run);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> StatsIndex {
        StatsIndex { runs: self.runs }
    }
}

/// Read-only index of statistics keyed by run, then metric label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsIndex {
    runs: BTreeMap<ExperimentKey, RunStats>,
}

impl StatsIndex {
    /// `None` means the run was never recorded. A recorded run with no
    /// metrics is `Some` with an empty `RunStats`.
    pub fn get(&self, key: &ExperimentKey) -> Option<&RunStats> {
        self.runs.get(key)
    }

    pub fn record(&self, key: &ExperimentKey, metric: &str) -> Option<&StatsRecord> {
        self.runs.get(key).and_then(|run| run.get(metric))
    }

    pub fn contains(&self, key: &ExperimentKey) -> bool {
        self.runs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ExperimentKey> {
        self.runs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExperimentKey, &RunStats)> {
        self.runs.iter()
    }

    /// Distinct `(workload, instances, threads)` triples, sorted.
    pub fn cells(&self) -> Vec<Cell> {
        self.runs
            .keys()
            .map(ExperimentKey::cell)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
