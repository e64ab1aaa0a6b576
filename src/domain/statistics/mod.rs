pub mod index;
pub mod record;

pub use index::{RunStats, StatsIndex, StatsIndexBuilder};
pub use record::{StatsRecord, Z_95, Z_99};
