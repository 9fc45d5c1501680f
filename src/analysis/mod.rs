//! Aggregation and derived-insight computation over survey records.

pub mod aggregator;
pub mod insights;

pub use aggregator::{aggregate, MemoizedAggregate, RecordSet};
pub use insights::derive_insights;
