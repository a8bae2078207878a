//! Pipeline entry points and the steps around the table write.
//!
//! - `run_sync`: Scrape, merge with the baseline and replace the stored table

pub mod circuit_breaker;
pub mod diff;
pub mod reconcile;
pub mod sync;

pub use reconcile::{reconcile, reconcile_table};
pub use sync::{SyncOptions, SyncSummary, run_sync};
