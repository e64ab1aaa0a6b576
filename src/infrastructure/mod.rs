pub mod dataset_resolver;
pub mod export;
pub mod sample_loader;

pub use dataset_resolver::DatasetResolver;
pub use export::PlotDataExporter;
pub use sample_loader::{FileSampleSource, SampleLoader};
