//! CSV Export functionality
//!
//! Nested records are flattened into one row each.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CashFlowPrediction, Category, WeekId, WeeklyBudgetComparison, WeeklyData};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyRow {
    week: WeekId,
    week_start: NaiveDate,
    week_end: NaiveDate,
    category: Category,
    amount: f64,
    is_income: bool,
    redeemable: f64,
    non_redeemable: f64,
    vacation: f64,
    non_vacation: f64,
    transaction_count: u32,
}

impl From<&WeeklyData> for WeeklyRow {
    fn from(data: &WeeklyData) -> Self {
        Self {
            week: data.week,
            week_start: data.week_start,
            week_end: data.week_end,
            category: data.category,
            amount: data.amount,
            is_income: data.is_income,
            redeemable: data.qualifiers.redeemable,
            non_redeemable: data.qualifiers.non_redeemable,
            vacation: data.qualifiers.vacation,
            non_vacation: data.qualifiers.non_vacation,
            transaction_count: data.qualifiers.transaction_count,
        }
    }
}

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

fn write_rows<W, I, T>(rows: I, writer: &mut W) -> BudgetResult<()>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row).map_err(export_err)?;
    }
    csv_writer.flush().map_err(export_err)?;
    Ok(())
}

/// Export weekly aggregates, one row per (week, category)
pub fn export_weekly_csv<W: Write>(records: &[WeeklyData], writer: &mut W) -> BudgetResult<()> {
    write_rows(records.iter().map(WeeklyRow::from), writer)
}

/// Export budget comparisons, one row per category
pub fn export_comparisons_csv<W: Write>(
    records: &[WeeklyBudgetComparison],
    writer: &mut W,
) -> BudgetResult<()> {
    write_rows(records, writer)
}

/// Export a forecast as a single row
pub fn export_forecast_csv<W: Write>(
    prediction: &CashFlowPrediction,
    writer: &mut W,
) -> BudgetResult<()> {
    write_rows(std::iter::once(prediction), writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QualifierBreakdown, WeekBounds};

    fn sample_weekly() -> WeeklyData {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        WeeklyData::new(
            "2025-W02".parse().unwrap(),
            Category::Groceries,
            -80.5,
            QualifierBreakdown {
                non_redeemable: -80.5,
                non_vacation: -80.5,
                transaction_count: 2,
                ..Default::default()
            },
            WeekBounds::starting(start).unwrap(),
        )
    }

    #[test]
    fn test_weekly_csv() {
        let mut out = Vec::new();
        export_weekly_csv(&[sample_weekly()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "week,weekStart,weekEnd,category,amount,isIncome,redeemable,nonRedeemable,vacation,nonVacation,transactionCount"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2025-W02,2025-01-06,2025-01-12,groceries,-80.5,false,0.0,-80.5,0.0,-80.5,2"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_comparison_csv() {
        let comparison = WeeklyBudgetComparison {
            week: "2025-W03".parse().unwrap(),
            category: Category::Dining,
            actual: -300.0,
            target: -200.0,
            variance: -100.0,
            rollover_accumulated: 50.0,
            effective_target: -150.0,
        };

        let mut out = Vec::new();
        export_comparisons_csv(&[comparison], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("week,category,actual,target,variance,rolloverAccumulated,effectiveTarget\n"));
        assert!(text.contains("2025-W03,dining,-300.0,-200.0,-100.0,50.0,-150.0"));
    }

    #[test]
    fn test_forecast_csv_single_row() {
        let mut out = Vec::new();
        export_forecast_csv(&CashFlowPrediction::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }
}
