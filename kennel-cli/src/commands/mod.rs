//! Subcommand implementations

pub mod serve;
pub mod stats;

pub use serve::run_serve;
pub use stats::run_stats;
