//! JSON Export functionality
//!
//! Wraps the exported records in a document with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExportData;
use crate::error::{BudgetError, BudgetResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    /// "weekly", "comparison" or "forecast"
    pub kind: &'static str,

    pub records: ExportRecords<'a>,
}

/// Payload of an export document
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportRecords<'a> {
    Weekly(&'a [crate::models::WeeklyData]),
    Comparison(&'a [crate::models::WeeklyBudgetComparison]),
    Forecast(&'a crate::models::CashFlowPrediction),
}

impl<'a> ExportDocument<'a> {
    pub fn new(data: ExportData<'a>) -> Self {
        let records = match data {
            ExportData::Weekly(r) => ExportRecords::Weekly(r),
            ExportData::Comparison(r) => ExportRecords::Comparison(r),
            ExportData::Forecast(p) => ExportRecords::Forecast(p),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            kind: data.kind(),
            records,
        }
    }
}

/// Export as pretty-printed JSON
pub fn export_json<W: Write>(data: ExportData<'_>, writer: &mut W) -> BudgetResult<()> {
    let document = ExportDocument::new(data);
    serde_json::to_writer_pretty(&mut *writer, &document)
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
