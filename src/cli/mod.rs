//! CLI command handlers
//!
//! This module bridges clap argument parsing with the engines and the
//! state store.

pub mod export;
pub mod plan;
pub mod report;
pub mod state;
pub mod week;

use std::path::PathBuf;

use crate::config::{BudgetPaths, Settings};
use crate::error::BudgetResult;
use crate::models::{BudgetState, Transaction, WeeklyData};
use crate::notify::{ConsoleNotifier, Notifier};
use crate::services::{TransactionFilters, WeeklyAggregator};
use crate::storage::{load_transactions, FileBackend, StateStore};

pub use export::{handle_export_command, ExportArgs};
pub use plan::{handle_plan_command, PlanCommands};
pub use report::{handle_compare_command, handle_forecast_command, handle_weekly_command};
pub use state::{handle_state_command, StateCommands};
pub use week::{handle_week_command, WeekCommands};

/// Everything a command handler needs
pub struct CliContext {
    pub paths: BudgetPaths,
    pub settings: Settings,
    backend: FileBackend,
    notifier: ConsoleNotifier,
}

impl CliContext {
    pub fn new(paths: BudgetPaths, settings: Settings) -> Self {
        let backend = FileBackend::new(paths.state_dir());
        Self {
            paths,
            settings,
            backend,
            notifier: ConsoleNotifier,
        }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        &self.notifier
    }

    /// State store under the configured key
    pub fn store(&self) -> StateStore<'_> {
        StateStore::new(&self.backend, &self.notifier).with_key(self.settings.state_key.clone())
    }

    /// Read the transaction source, preferring an explicit path
    pub fn transactions(&self, explicit: Option<PathBuf>) -> BudgetResult<Vec<Transaction>> {
        load_transactions(self.settings.transactions_path(&self.paths, explicit))
    }

    /// Aggregate with the filters stored in `state`
    pub fn weekly_data(&self, transactions: &[Transaction], state: &BudgetState) -> Vec<WeeklyData> {
        WeeklyAggregator::new(self.notifier())
            .aggregate(transactions, &TransactionFilters::from_state(state))
    }
}

/// Two-decimal money formatting for tables
pub(crate) fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}
