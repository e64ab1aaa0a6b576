use crate::domain::catalog::MetricCatalog;
use crate::domain::comparison::{ComparisonFailure, ComparisonRecord, ComparisonReport};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub timestamp: DateTime<Utc>,
    pub configuration: String,
    pub baseline: &'a str,
    pub records: &'a [ComparisonRecord],
    pub failures: &'a [ComparisonFailure],
    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub cells: usize,
    pub records: usize,
    pub failures: usize,
    /// Records whose improvement magnitude exceeds the 99% error band.
    pub significant: usize,
    pub best_improvement: String,
    pub worst_improvement: String,
}

pub struct ComparisonReporter {
    output_dir: PathBuf,
}

impl ComparisonReporter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create report directory {}", output_dir.display())
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Writes a timestamped JSON run report and returns its path.
    pub fn generate_report(&self, report: &ComparisonReport, config_desc: &str) -> Result<PathBuf> {
        let now = Utc::now();
        let run_report = RunReport {
            timestamp: now,
            configuration: config_desc.to_string(),
            baseline: &report.baseline,
            records: &report.records,
            failures: &report.failures,
            summary: Self::calculate_summary(report),
        };

        let json =
            serde_json::to_string_pretty(&run_report).context("Failed to serialize run report")?;
        let path = self
            .output_dir
            .join(format!("comparison_report_{}.json", now.format("%Y%m%d_%H%M%S")));
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report file {}", path.display()))?;

        info!("Report saved to {}", path.display());
        Ok(path)
    }

    pub fn print_summary(&self, report: &ComparisonReport, catalog: &MetricCatalog) {
        if report.records.is_empty() && report.failures.is_empty() {
            println!("No comparison results to report.");
            return;
        }

        println!("\n{}", "=".repeat(110));
        println!("COMPARISON SUMMARY (baseline: {})", report.baseline);
        println!("{}", "=".repeat(110));
        println!(
            "{:<12} | {:>3} | {:>3} | {:<22} | {:<10} | {:>9} | {:>12} | {:>9}",
            "Workload", "N", "T", "Metric", "Config", "Ratio", "Improvement", "Band99"
        );
        println!("{}", "-".repeat(110));

        for rec in &report.records {
            let name = catalog
                .lookup(&rec.metric)
                .map(|m| m.display_name.as_str())
                .unwrap_or(rec.metric.as_str());
            let flag = if is_significant(rec) { "" } else { " ~noise" };
            println!(
                "{:<12} | {:>3} | {:>3} | {:<22} | {:<10} | {:>9.4} | {:>11.2}% | {:>8.2}%{}",
                rec.workload,
                rec.instances,
                rec.threads,
                name,
                rec.configuration,
                rec.ratio,
                rec.relative_improvement * 100.0,
                rec.relative_error_band * 100.0,
                flag
            );
        }
        println!("{}", "=".repeat(110));

        if !report.failures.is_empty() {
            println!("\nFAILED CELLS:");
            println!("{}", "-".repeat(80));
            for f in &report.failures {
                println!(
                    "  {} N{:02} T{:02} [{}] {}: {}",
                    f.workload, f.instances, f.threads, f.metric, f.configuration, f.error
                );
            }
            println!("{}", "-".repeat(80));
        }

        let summary = Self::calculate_summary(report);
        println!(
            "\n{} cells, {} records ({} beyond the 99% band), {} failures",
            summary.cells, summary.records, summary.significant, summary.failures
        );
        println!("Best:  {}", summary.best_improvement);
        println!("Worst: {}\n", summary.worst_improvement);
    }

    pub fn calculate_summary(report: &ComparisonReport) -> RunSummary {
        let mut cells: Vec<_> = report.records.iter().map(|r| r.cell()).collect();
        cells.sort();
        cells.dedup();

        let describe = |rec: Option<&ComparisonRecord>| {
            rec.map(|r| {
                format!(
                    "{} N{:02} T{:02} {} {} ({:+.2}%)",
                    r.workload,
                    r.instances,
                    r.threads,
                    r.metric,
                    r.configuration,
                    r.relative_improvement * 100.0
                )
            })
            .unwrap_or_else(|| "N/A".to_string())
        };

        RunSummary {
            cells: cells.len(),
            records: report.records.len(),
            failures: report.failures.len(),
            significant: report.records.iter().filter(|r| is_significant(r)).count(),
            best_improvement: describe(report.best()),
            worst_improvement: describe(report.worst()),
        }
    }
}

fn is_significant(rec: &ComparisonRecord) -> bool {
    rec.relative_improvement.abs() > rec.relative_error_band
}
