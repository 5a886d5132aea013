//! Core data models for weekly-budget
//!
//! This module contains the data structures of the budgeting domain:
//! transactions, ISO weeks, weekly aggregates, budget plans and the
//! persisted view state.

pub mod budget;
pub mod category;
pub mod state;
pub mod transaction;
pub mod week;
pub mod weekly;

pub use budget::{BudgetPlan, CashFlowPrediction, CategoryBudget, WeeklyBudgetComparison};
pub use category::Category;
pub use state::{BudgetState, StateDocument, StatePatch, ViewGranularity, ViewSelection};
pub use transaction::Transaction;
pub use week::{WeekBounds, WeekId};
pub use weekly::{QualifierBreakdown, WeeklyData};
