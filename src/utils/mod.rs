pub mod stats;

pub use stats::TraversalStats;
