//! Aggregation policy engine and its diagnostic view.

pub mod controller;
pub mod report;

pub use controller::{Adjustment, AggregationController, RunSummary};
pub use report::RegistryReport;
