use perfcompare::application::benchmarking::BenchmarkEngine;
use perfcompare::application::plot_data::PlotDataBuilder;
use perfcompare::config::Config;
use perfcompare::domain::catalog::MetricCatalog;
use perfcompare::domain::errors::{LoadError, PipelineError};
use perfcompare::domain::experiment::{
    Configuration, ConfigurationSet, ExperimentGrid, ExperimentKey,
};
use perfcompare::infrastructure::{DatasetResolver, FileSampleSource, PlotDataExporter};
use std::fs;
use std::path::Path;

// Run with: cargo test --test end_to_end_pipeline

fn catalog() -> MetricCatalog {
    let mut catalog = MetricCatalog::new();
    catalog
        .define("ctime", "Time [s]", "Workload completion time [s]", 1, true)
        .unwrap();
    catalog
}

fn configurations() -> ConfigurationSet {
    ConfigurationSet::new(vec![
        Configuration::new("NOBBQ", "Unmanaged", "0.2"),
        Configuration::new("BBQ", "BBQ Managed", "0.6"),
    ])
    .unwrap()
}

fn grid() -> ExperimentGrid {
    ExperimentGrid {
        workloads: vec!["w".to_string()],
        instances: vec![1],
        threads: vec![1],
    }
}

fn write_run(dir: &Path, config: &str, rows: &str) {
    let resolver = DatasetResolver::new(dir, "PARSECTest", "dat");
    let key = ExperimentKey::new("w", 1, 1, config).unwrap();
    fs::write(resolver.path_for(&key), rows).unwrap();
}

#[test]
fn test_two_configuration_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), "NOBBQ", "0 10.0\n1 12.0\n");
    write_run(dir.path(), "BBQ", "0 8.0\n1 8.0\n");

    let (catalog, configs) = (catalog(), configurations());
    let source = FileSampleSource::new(DatasetResolver::new(dir.path(), "PARSECTest", "dat"));
    let outcome = BenchmarkEngine::new(&source, &catalog, &configs)
        .run(&grid(), None)
        .unwrap();

    let base_key = ExperimentKey::new("w", 1, 1, "NOBBQ").unwrap();
    let base = outcome.index.record(&base_key, "ctime").unwrap();
    assert_eq!(base.n, 2);
    assert!((base.mean - 11.0).abs() < 1e-12);
    assert!((base.stddev - 1.414).abs() < 1e-3);

    let other = outcome
        .index
        .record(&base_key.with_configuration("BBQ"), "ctime")
        .unwrap();
    assert_eq!(other.n, 2);
    assert_eq!(other.mean, 8.0);
    assert_eq!(other.stddev, 0.0);

    assert!(outcome.report.is_complete());
    assert_eq!(outcome.report.records.len(), 1);
    let rec = &outcome.report.records[0];
    assert_eq!(rec.configuration, "BBQ");
    assert!((rec.relative_improvement - (1.0 - 8.0 / 11.0)).abs() < 1e-12);
    assert!((rec.relative_improvement - 0.2727).abs() < 1e-4);
}

#[test]
fn test_empty_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), "NOBBQ", "0 10.0\n1 12.0\n");
    write_run(dir.path(), "BBQ", "");

    let (catalog, configs) = (catalog(), configurations());
    let source = FileSampleSource::new(DatasetResolver::new(dir.path(), "PARSECTest", "dat"));
    let engine = BenchmarkEngine::new(&source, &catalog, &configs);

    let err = engine.run(&grid(), None).unwrap_err();
    match err {
        PipelineError::Load { key, source } => {
            assert_eq!(key.configuration(), "BBQ");
            assert!(matches!(source, LoadError::EmptyFile { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // aggregation alone must fail the same way: no index is handed out
    let keys = grid().keys(&configs).unwrap();
    assert!(engine.aggregate(&keys).is_err());
}

#[test]
fn test_malformed_row_names_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), "NOBBQ", "0 10.0\n1 twelve\n");
    write_run(dir.path(), "BBQ", "0 8.0\n");

    let (catalog, configs) = (catalog(), configurations());
    let source = FileSampleSource::new(DatasetResolver::new(dir.path(), "PARSECTest", "dat"));
    let err = BenchmarkEngine::new(&source, &catalog, &configs)
        .run(&grid(), None)
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("w/N01/T01/NOBBQ"), "{msg}");
    assert!(msg.contains("twelve"), "{msg}");
}

#[test]
fn test_missing_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), "NOBBQ", "0 10.0\n");

    let (catalog, configs) = (catalog(), configurations());
    let source = FileSampleSource::new(DatasetResolver::new(dir.path(), "PARSECTest", "dat"));
    let err = BenchmarkEngine::new(&source, &catalog, &configs)
        .with_parallelism(true)
        .run(&grid(), None)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load {
            source: LoadError::MissingFile { .. },
            ..
        }
    ));
}

#[test]
fn test_default_campaign_with_exports() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.dataset.dir = data.path().to_path_buf();
    config.grid.workloads = vec!["ferret".to_string()];
    config.grid.instances = vec![1, 3];
    config.grid.threads = vec![4];
    config.parallel = true;

    let catalog = config.catalog().unwrap();
    let configs = config.configuration_set().unwrap();
    let grid = config.grid().unwrap();
    let resolver = config.resolver();

    // 20 metric columns after the trial number
    for key in grid.keys(&configs).unwrap() {
        let scale = if key.configuration() == "BBQ" { 0.9 } else { 1.0 };
        let mut content = String::from("# trial ctime power ...\n");
        for trial in 0..3 {
            content.push_str(&trial.to_string());
            for column in 1..=20 {
                let value = scale * (column as f64 * 10.0 + trial as f64) * key.instances() as f64;
                content.push_str(&format!(" {value}"));
            }
            content.push('\n');
        }
        fs::write(resolver.path_for(&key), content).unwrap();
    }

    let source = FileSampleSource::new(resolver);
    let outcome = BenchmarkEngine::new(&source, &catalog, &configs)
        .with_parallelism(config.parallel)
        .run(&grid, None)
        .unwrap();

    assert_eq!(outcome.index.len(), 4);
    // 2 cells x 20 metrics x 1 non-baseline configuration
    assert_eq!(outcome.report.records.len(), 40);
    let ctime = outcome.report.records.iter().find(|r| r.metric == "ctime").unwrap();
    assert!((ctime.ratio - 0.9).abs() < 1e-9);
    assert!((ctime.relative_improvement - 0.1).abs() < 1e-9);
    let ipc = outcome.report.records.iter().find(|r| r.metric == "ipc").unwrap();
    assert!((ipc.relative_improvement + 0.1).abs() < 1e-9);

    let builder = PlotDataBuilder::new(&catalog, &configs);
    let exporter = PlotDataExporter::new(out.path()).unwrap();
    let series = builder
        .instance_series(&outcome.index, "ferret", "power", 4, &grid.instances)
        .unwrap();
    let csv_path = exporter.write_instance_series(&series).unwrap();
    assert!(csv_path.ends_with("PTest-ferret-power-T04.csv"));

    let cmp = builder.comparison_series(&outcome.report, "ferret", 3, 4).unwrap();
    assert_eq!(cmp.entries.len(), 20);
    let json_path = exporter.write_comparison_series(&cmp).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["baseline"], "NOBBQ");
    assert_eq!(json["entries"][0]["metric"], "ctime");
    assert_eq!(json["entries"][0]["display_name"], "Time [s]");
}
