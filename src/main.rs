use anyhow::Context;
use clap::{Parser, Subcommand};
use perfcompare::application::benchmarking::{
    BenchmarkEngine, ComparisonReporter, EngineOutcome,
};
use perfcompare::application::plot_data::PlotDataBuilder;
use perfcompare::config::Config;
use perfcompare::domain::catalog::MetricCatalog;
use perfcompare::domain::experiment::{ConfigurationSet, ExperimentGrid};
use perfcompare::infrastructure::{FileSampleSource, PlotDataExporter};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Aggregate and compare managed vs unmanaged benchmark runs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every run of the grid, aggregate, compare and export plot data
    Run {
        /// TOML run configuration (defaults to PERFCOMPARE_CONFIG or built-in tables)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the sample files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory receiving plot data and the run report
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Configuration to normalize against (defaults to the first declared one)
        #[arg(short, long)]
        baseline: Option<String>,

        /// Load and aggregate runs in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Skip writing plot series
        #[arg(long)]
        no_export: bool,
    },
    /// List the metric catalog
    Metrics {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the built-in configuration as TOML
    Init {
        #[arg(short, long, default_value = "perfcompare.toml")]
        output: PathBuf,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::from_env(path.as_deref())
}

fn export_plot_data(
    outcome: &EngineOutcome,
    catalog: &MetricCatalog,
    configurations: &ConfigurationSet,
    grid: &ExperimentGrid,
    exporter: &PlotDataExporter,
) -> anyhow::Result<usize> {
    let builder = PlotDataBuilder::new(catalog, configurations);
    let mut written = 0;

    for workload in &grid.workloads {
        for &threads in &grid.threads {
            for metric in catalog.iter() {
                let series = builder.instance_series(
                    &outcome.index,
                    workload,
                    &metric.label,
                    threads,
                    &grid.instances,
                )?;
                exporter.write_instance_series(&series)?;
                written += 1;
            }
            for &instances in &grid.instances {
                let series =
                    builder.comparison_series(&outcome.report, workload, instances, threads)?;
                exporter.write_comparison_series(&series)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output_dir,
            baseline,
            parallel,
            no_export,
        } => {
            let mut config = load_config(config)?;
            if let Some(dir) = data_dir {
                config.dataset.dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            config.parallel |= parallel;
            config.output.export &= !no_export;

            let catalog = config.catalog().context("Invalid metric table")?;
            let configurations = config
                .configuration_set()
                .context("Invalid configuration list")?;
            let grid = config.grid().context("Invalid experiment grid")?;
            let source = FileSampleSource::new(config.resolver());

            info!(
                "Reading samples from {} ({} metrics, {} configurations)",
                config.dataset.dir.display(),
                catalog.len(),
                configurations.len()
            );

            let outcome = BenchmarkEngine::new(&source, &catalog, &configurations)
                .with_parallelism(config.parallel)
                .run(&grid, baseline.as_deref())?;

            let reporter = ComparisonReporter::new(&config.output.dir)?;
            reporter.print_summary(&outcome.report, &catalog);
            let description = format!(
                "{} workloads x {} instance counts x {} thread counts",
                grid.workloads.len(),
                grid.instances.len(),
                grid.threads.len()
            );
            reporter.generate_report(&outcome.report, &description)?;

            if config.output.export {
                let exporter = PlotDataExporter::new(&config.output.dir)?;
                let written =
                    export_plot_data(&outcome, &catalog, &configurations, &grid, &exporter)?;
                info!(
                    "Exported {} plot series to {}",
                    written,
                    config.output.dir.display()
                );
            }

            if !outcome.report.is_complete() {
                warn!(
                    "{} comparison cells could not be computed",
                    outcome.report.failures.len()
                );
            }
        }
        Commands::Metrics { config } => {
            let config = load_config(config)?;
            let catalog = config.catalog().context("Invalid metric table")?;

            println!(
                "{:<14} | {:>6} | {:<8} | {:<20} | Description",
                "Label", "Column", "Better", "Name"
            );
            println!("{}", "-".repeat(100));
            for m in catalog.iter() {
                println!(
                    "{:<14} | {:>6} | {:<8} | {:<20} | {}",
                    m.label,
                    m.source_column,
                    if m.lower_is_better { "lower" } else { "higher" },
                    m.display_name,
                    m.description
                );
            }
        }
        Commands::Init { output } => {
            let text = Config::default().to_toml()?;
            std::fs::write(&output, text)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Default configuration written to {}", output.display());
        }
    }

    Ok(())
}
