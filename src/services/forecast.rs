//! Cash-flow forecast
//!
//! Compares the plan's weekly targets with the average of recent weeks.
//! Any non-finite input fails the whole prediction.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, CashFlowPrediction, WeekId, WeeklyData};
use crate::notify::Notifier;

/// Number of trailing weeks averaged when no other value is configured
pub const DEFAULT_WEEKS_TO_AVERAGE: usize = 12;

/// Service predicting net weekly cash flow
pub struct ForecastEngine<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> ForecastEngine<'a> {
    /// Create a new forecast engine reporting through `notifier`
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    /// Predict weekly cash flow from the plan and up to `weeks_to_average`
    /// of the most recent weeks in `historic`.
    pub fn predict(
        &self,
        plan: &BudgetPlan,
        historic: &[WeeklyData],
        weeks_to_average: usize,
    ) -> BudgetResult<CashFlowPrediction> {
        let mut total_income_target = 0.0;
        let mut total_expense_target = 0.0;

        for (category, budget) in &plan.category_budgets {
            let target = budget.weekly_target;
            if !target.is_finite() {
                return Err(self.fail(format!(
                    "weekly target for {} is not a finite number",
                    category
                )));
            }
            if target > 0.0 {
                total_income_target += target;
            } else {
                total_expense_target += target.abs();
            }
        }

        let predicted_net_income = total_income_target - total_expense_target;
        if !predicted_net_income.is_finite() {
            return Err(self.fail("budget targets overflow".to_string()));
        }

        let all_weeks: BTreeSet<WeekId> = historic.iter().map(|d| d.week).collect();
        let skip = all_weeks.len().saturating_sub(weeks_to_average);
        let window: BTreeSet<WeekId> = all_weeks.into_iter().skip(skip).collect();

        if window.is_empty() {
            return Ok(CashFlowPrediction {
                total_income_target,
                total_expense_target,
                predicted_net_income,
                historic_avg_income: 0.0,
                historic_avg_expense: 0.0,
                variance: predicted_net_income,
            });
        }

        let mut income = 0.0;
        let mut expense = 0.0;

        for record in historic.iter().filter(|d| window.contains(&d.week)) {
            if !record.amount.is_finite() {
                return Err(self.fail(format!(
                    "historic amount for {} in {} is not a finite number",
                    record.category, record.week
                )));
            }
            if record.is_income {
                income += record.amount;
            } else {
                expense += record.amount.abs();
            }
        }

        let weeks_counted = window.len() as f64;
        let historic_avg_income = income / weeks_counted;
        let historic_avg_expense = expense / weeks_counted;
        let variance = predicted_net_income - (historic_avg_income - historic_avg_expense);

        if !historic_avg_income.is_finite() || !historic_avg_expense.is_finite() || !variance.is_finite() {
            return Err(self.fail("historic totals overflow".to_string()));
        }

        debug!(weeks = window.len(), "forecast computed");

        Ok(CashFlowPrediction {
            total_income_target,
            total_expense_target,
            predicted_net_income,
            historic_avg_income,
            historic_avg_expense,
            variance,
        })
    }

    fn fail(&self, reason: String) -> BudgetError {
        self.notifier
            .error(&format!("Unable to forecast cash flow: {}.", reason));
        BudgetError::Forecast(reason)
    }
}
