//! weekly-budget - ISO-week budgeting engine
//!
//! This library aggregates transactions into ISO weeks, compares weekly
//! spending with a per-category budget plan (optionally carrying unspent
//! budget forward), and forecasts weekly cash flow.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (weeks, transactions, plans, view state)
//! - `services`: Week calendar and the aggregation/rollover/comparison/forecast engines
//! - `storage`: View state persistence and transaction sources
//! - `notify`: User-facing notification sink
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use weekly_budget::notify::TracingNotifier;
//! use weekly_budget::services::{TransactionFilters, WeeklyAggregator};
//!
//! let notifier = TracingNotifier;
//! let weekly = WeeklyAggregator::new(&notifier)
//!     .aggregate(&transactions, &TransactionFilters::default());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
