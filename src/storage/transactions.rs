//! Transaction source reader
//!
//! Transactions are owned by an external store; this module only reads a
//! snapshot of them from a JSON array or a CSV export.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Category, Transaction};

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> BudgetResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(BudgetError::Import(format!(
                "Unsupported transaction file '{}' (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

/// Load and validate every transaction in `path`.
///
/// A missing file is an empty transaction list.
pub fn load_transactions<P: AsRef<Path>>(path: P) -> BudgetResult<Vec<Transaction>> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;

    if !path.exists() {
        debug!(path = %path.display(), "no transaction file; starting empty");
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| {
        BudgetError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let transactions = parse_transactions(file, format)?;
    debug!(path = %path.display(), count = transactions.len(), "loaded transactions");
    Ok(transactions)
}

/// Parse transactions from any reader
pub fn parse_transactions<R: Read>(reader: R, format: SourceFormat) -> BudgetResult<Vec<Transaction>> {
    let transactions = match format {
        SourceFormat::Json => serde_json::from_reader::<_, Vec<Transaction>>(reader)
            .map_err(|e| BudgetError::Import(format!("Invalid transaction JSON: {}", e)))?,
        SourceFormat::Csv => parse_csv(reader)?,
    };

    for txn in &transactions {
        txn.validate()
            .map_err(|e| BudgetError::Import(e.to_string()))?;
    }

    Ok(transactions)
}

/// One CSV row; flags may be left blank
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    id: String,
    date: String,
    #[serde(default)]
    description: String,
    amount: f64,
    category: String,
    #[serde(default)]
    redeemable: Option<bool>,
    #[serde(default)]
    vacation: Option<bool>,
    #[serde(default)]
    transfer: Option<bool>,
    #[serde(default)]
    redemption_rate: Option<f64>,
    #[serde(default)]
    linked_transaction_id: Option<String>,
    #[serde(default)]
    statement_ids: Option<String>,
}

impl CsvRow {
    fn into_transaction(self) -> BudgetResult<Transaction> {
        let category: Category = self.category.parse()?;

        let statement_ids = self
            .statement_ids
            .map(|ids| {
                ids.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Transaction {
            id: self.id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            category,
            redeemable: self.redeemable.unwrap_or(false),
            vacation: self.vacation.unwrap_or(false),
            transfer: self.transfer.unwrap_or(false),
            redemption_rate: self.redemption_rate.unwrap_or(0.0),
            linked_transaction_id: self.linked_transaction_id.filter(|s| !s.is_empty()),
            statement_ids,
        })
    }
}

fn parse_csv<R: Read>(reader: R) -> BudgetResult<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = row.map_err(|e| {
            BudgetError::Import(format!("Invalid transaction on line {}: {}", line, e))
        })?;
        let txn = row.into_transaction().map_err(|e| {
            BudgetError::Import(format!("Invalid transaction on line {}: {}", line, e))
        })?;
        transactions.push(txn);
    }

    Ok(transactions)
}
