//! Analysis modules.
//!
//! Derives chart series and summary statistics from parsed records.

pub mod aggregator;

pub use aggregator::*;
