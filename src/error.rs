//! Custom error types for weekly-budget
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for weekly-budget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// A calendar date that does not exist or cannot be parsed
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    /// A week identifier that does not match `YYYY-Wnn` or names no real week
    #[error("Invalid week identifier '{input}': {reason}")]
    InvalidWeekId { input: String, reason: String },

    /// Moving to an adjacent week failed
    #[error("Cannot compute {direction} week of '{week}' (expected format YYYY-Wnn, e.g. 2025-W03)")]
    WeekNavigation {
        direction: &'static str,
        week: String,
        #[source]
        source: Box<BudgetError>,
    },

    /// A numeric input was NaN or infinite
    #[error("Invalid {field} for category '{category}' in week {week}: {value}")]
    InvalidNumber {
        category: String,
        week: String,
        field: &'static str,
        value: f64,
    },

    /// Arithmetic left the range of finite numbers
    #[error("Arithmetic overflow for category '{category}' in week {week}")]
    Overflow { category: String, week: String },

    /// Forecast could not be computed
    #[error("Forecast error: {0}")]
    Forecast(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted data did not read back as written
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BudgetError {
    /// Create an invalid date error
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid week identifier error
    pub fn invalid_week(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidWeekId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a non-finite input error
    pub fn is_invalid_number(&self) -> bool {
        matches!(self, Self::InvalidNumber { .. })
    }

    /// Check if this is an overflow error
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for weekly-budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
