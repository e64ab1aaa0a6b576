use crate::domain::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named metric of the profiling output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub label: String,
    pub display_name: String,
    pub description: String,
    /// Field position within a sample row, counted from zero. Field 0 of the
    /// profiling output carries the trial number, so metric columns start at 1.
    pub source_column: usize,
    pub lower_is_better: bool,
}

/// Registry of metrics, keyed by label.
///
/// Insertion order is significant: it is the column extraction order of the
/// sample loader and the metric order of every comparison output.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    metrics: Vec<MetricDefinition>,
    by_label: HashMap<String, usize>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        label: &str,
        display_name: &str,
        description: &str,
        source_column: usize,
        lower_is_better: bool,
    ) -> Result<&MetricDefinition, ConfigurationError> {
        self.register(MetricDefinition {
            label: label.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            source_column,
            lower_is_better,
        })
    }

    pub fn register(
        &mut self,
        metric: MetricDefinition,
    ) -> Result<&MetricDefinition, ConfigurationError> {
        if self.by_label.contains_key(&metric.label) {
            return Err(ConfigurationError::DuplicateMetric {
                label: metric.label,
            });
        }
        let slot = self.metrics.len();
        self.by_label.insert(metric.label.clone(), slot);
        self.metrics.push(metric);
        Ok(&self.metrics[slot])
    }

    pub fn lookup(&self, label: &str) -> Result<&MetricDefinition, ConfigurationError> {
        self.by_label
            .get(label)
            .map(|&slot| &self.metrics[slot])
            .ok_or_else(|| ConfigurationError::UnknownMetric {
                label: label.to_string(),
            })
    }

    /// Source columns in catalog order.
    pub fn all_columns(&self) -> Vec<usize> {
        self.metrics.iter().map(|m| m.source_column).collect()
    }

    /// Position of a metric in catalog order; also its column in a loaded `SampleMatrix`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl TryFrom<Vec<MetricDefinition>> for MetricCatalog {
    type Error = ConfigurationError;

    fn try_from(metrics: Vec<MetricDefinition>) -> Result<Self, Self::Error> {
        let mut catalog = MetricCatalog::new();
        for metric in metrics {
            catalog.register(metric)?;
        }
        Ok(catalog)
    }
}
