use crate::application::plot_data::{ComparisonSeries, InstanceSeries};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flat CSV row of an instance series.
#[derive(Debug, Serialize)]
struct InstanceRow<'a> {
    configuration: &'a str,
    label: &'a str,
    instances: u32,
    mean: f64,
    stddev: f64,
    n: usize,
    stderr: f64,
    ci95: f64,
    ci99: f64,
    min: f64,
    max: f64,
}

/// Writes plot-ready series for the external renderer.
pub struct PlotDataExporter {
    output_dir: PathBuf,
}

impl PlotDataExporter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create export directory {}", output_dir.display())
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn instance_series_path(&self, series: &InstanceSeries) -> PathBuf {
        self.output_dir.join(format!(
            "PTest-{}-{}-T{:02}.csv",
            series.workload, series.metric, series.threads
        ))
    }

    pub fn comparison_series_path(&self, series: &ComparisonSeries) -> PathBuf {
        self.output_dir.join(format!(
            "PCmp-{}-N{:02}-T{:02}.json",
            series.workload, series.instances, series.threads
        ))
    }

    pub fn write_instance_series(&self, series: &InstanceSeries) -> Result<PathBuf> {
        let path = self.instance_series_path(series);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        for config in &series.series {
            for point in &config.points {
                writer.serialize(InstanceRow {
                    configuration: &config.configuration,
                    label: &config.label,
                    instances: point.instances,
                    mean: point.stats.mean,
                    stddev: point.stats.stddev,
                    n: point.stats.n,
                    stderr: point.stats.stderr,
                    ci95: point.stats.ci95,
                    ci99: point.stats.ci99,
                    min: point.stats.min,
                    max: point.stats.max,
                })?;
            }
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;

        debug!("Exported {}", path.display());
        Ok(path)
    }

    pub fn write_comparison_series(&self, series: &ComparisonSeries) -> Result<PathBuf> {
        let path = self.comparison_series_path(series);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), series)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Exported {}", path.display());
        Ok(path)
    }
}
