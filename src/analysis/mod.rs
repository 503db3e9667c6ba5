//! Analysis modules.
//!
//! Summary-card aggregation, grouping and sorting over record collections.

pub mod aggregator;

pub use aggregator::*;
