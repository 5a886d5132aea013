//! Service layer for weekly-budget
//!
//! Pure computations over transactions and budget plans. Nothing here
//! performs I/O; user-visible problems are reported through the injected
//! `Notifier`, and each engine keeps its own failure policy:
//!
//! - `aggregation` drops unresolvable weeks and keeps the rest
//! - `rollover` aborts on any invalid number
//! - `comparison` drops only the failing category
//! - `forecast` aborts on any invalid number

pub mod aggregation;
pub mod calendar;
pub mod comparison;
pub mod forecast;
pub mod qualifier;
pub mod rollover;

pub use aggregation::WeeklyAggregator;
pub use comparison::ComparisonEngine;
pub use forecast::{ForecastEngine, DEFAULT_WEEKS_TO_AVERAGE};
pub use qualifier::TransactionFilters;
pub use rollover::{RolloverEngine, RolloverMap};
