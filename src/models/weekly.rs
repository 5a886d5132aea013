//! Weekly aggregate models
//!
//! One `WeeklyData` record exists per (week, category) pair that had at
//! least one counted transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::week::{WeekBounds, WeekId};

/// Qualifier sub-totals for one (week, category) group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifierBreakdown {
    pub redeemable: f64,
    pub non_redeemable: f64,
    pub vacation: f64,
    pub non_vacation: f64,
    pub transaction_count: u32,
}

/// Aggregated amount for one category in one ISO week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyData {
    pub week: WeekId,
    pub category: Category,

    /// Sum of display amounts (after redemption-rate adjustment)
    pub amount: f64,

    /// Derived from the sign of `amount`
    pub is_income: bool,

    pub qualifiers: QualifierBreakdown,

    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

impl WeeklyData {
    /// Create a record, deriving `is_income` from the amount
    pub fn new(
        week: WeekId,
        category: Category,
        amount: f64,
        qualifiers: QualifierBreakdown,
        bounds: WeekBounds,
    ) -> Self {
        Self {
            week,
            category,
            amount,
            is_income: amount > 0.0,
            qualifiers,
            week_start: bounds.start,
            week_end: bounds.end,
        }
    }

    /// The week's calendar bounds
    pub fn bounds(&self) -> WeekBounds {
        WeekBounds {
            start: self.week_start,
            end: self.week_end,
        }
    }
}

impl fmt::Display for WeeklyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {:.2} ({} txns)",
            self.week, self.category, self.amount, self.qualifiers.transaction_count
        )
    }
}
