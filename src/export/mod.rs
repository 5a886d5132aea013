//! Export module for weekly-budget
//!
//! Writes weekly aggregates, budget comparisons and forecasts in three
//! formats:
//! - CSV: one flat row per record (spreadsheet-compatible)
//! - JSON: versioned document for machine consumption
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CashFlowPrediction, WeeklyBudgetComparison, WeeklyData};

pub use json::{ExportDocument, EXPORT_SCHEMA_VERSION};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(BudgetError::Export(format!(
                "Unknown export format '{}' (expected csv, json or yaml)",
                other
            ))),
        }
    }
}

/// Something that can be exported
#[derive(Debug, Clone, Copy)]
pub enum ExportData<'a> {
    Weekly(&'a [WeeklyData]),
    Comparison(&'a [WeeklyBudgetComparison]),
    Forecast(&'a CashFlowPrediction),
}

impl ExportData<'_> {
    /// Short name written into document headers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weekly(_) => "weekly",
            Self::Comparison(_) => "comparison",
            Self::Forecast(_) => "forecast",
        }
    }
}

/// Write `data` to `writer` in the requested format
pub fn export<W: Write>(data: ExportData<'_>, format: ExportFormat, writer: &mut W) -> BudgetResult<()> {
    match format {
        ExportFormat::Csv => match data {
            ExportData::Weekly(records) => csv::export_weekly_csv(records, writer),
            ExportData::Comparison(records) => csv::export_comparisons_csv(records, writer),
            ExportData::Forecast(prediction) => csv::export_forecast_csv(prediction, writer),
        },
        ExportFormat::Json => json::export_json(data, writer),
        ExportFormat::Yaml => yaml::export_yaml(data, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.to_string(), "json");
    }
}
