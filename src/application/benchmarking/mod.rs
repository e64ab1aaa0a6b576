pub mod engine;
pub mod reporting;

pub use engine::{BenchmarkEngine, EngineOutcome};
pub use reporting::ComparisonReporter;
