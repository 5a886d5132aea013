//! User settings for weekly-budget

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::services::DEFAULT_WEEKS_TO_AVERAGE;
use crate::storage::file_io::{read_json_required, write_json_atomic};
use crate::storage::DEFAULT_STATE_KEY;

/// User settings for weekly-budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Key the view state is stored under
    #[serde(default = "default_state_key")]
    pub state_key: String,

    /// Weeks of history the forecast averages over
    #[serde(default = "default_forecast_weeks")]
    pub forecast_weeks: usize,

    /// Transaction source used when no file is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions_file: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_state_key() -> String {
    DEFAULT_STATE_KEY.to_string()
}

fn default_forecast_weeks() -> usize {
    DEFAULT_WEEKS_TO_AVERAGE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            state_key: default_state_key(),
            forecast_weeks: default_forecast_weeks(),
            transactions_file: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        read_json_required(&settings_path).map_err(|e| {
            BudgetError::Config(format!("Failed to load settings: {}", e))
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The transaction source to read, preferring an explicit path
    pub fn transactions_path(&self, paths: &BudgetPaths, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.transactions_file.clone())
            .unwrap_or_else(|| paths.transactions_file())
    }
}
