// Per-run descriptive statistics
pub mod aggregator;

// Batch pass orchestration and reporting
pub mod benchmarking;

// Baseline-normalized comparisons
pub mod comparison_builder;

// Series for the plotting collaborator
pub mod plot_data;
