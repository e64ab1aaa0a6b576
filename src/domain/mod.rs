// Metric registry
pub mod catalog;

// Comparison records and reports
pub mod comparison;

// Domain-specific error types
pub mod errors;

// Runs, configurations and the experiment grid
pub mod experiment;

// Port interfaces
pub mod ports;

// Raw per-run measurements
pub mod samples;

// Descriptive statistics and the multi-dimensional index
pub mod statistics;
