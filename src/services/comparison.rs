//! Budget versus actual for a single week
//!
//! A category whose numbers cannot be combined is left out of the result
//! with a notification; every other category is still compared.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, Category, WeekId, WeeklyBudgetComparison, WeeklyData};
use crate::notify::Notifier;
use crate::services::rollover::RolloverEngine;

/// Service comparing a week's actuals against the plan
pub struct ComparisonEngine<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> ComparisonEngine<'a> {
    /// Create a new comparison engine reporting through `notifier`
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    /// One comparison per budgeted category for `week`.
    ///
    /// Rollover is accumulated from the earliest week in `weekly_data` up
    /// to, but excluding, `week`. A rollover failure is returned as an
    /// error; a failure building one category's record only drops that
    /// category.
    pub fn compare(
        &self,
        weekly_data: &[WeeklyData],
        plan: &BudgetPlan,
        week: &WeekId,
    ) -> BudgetResult<Vec<WeeklyBudgetComparison>> {
        let earliest = weekly_data.iter().map(|d| d.week).min().unwrap_or(*week);
        let rollover = RolloverEngine::new(self.notifier).rollover(weekly_data, plan, &earliest, week)?;

        let mut actuals: HashMap<Category, f64> = HashMap::new();
        for record in weekly_data.iter().filter(|d| d.week == *week) {
            *actuals.entry(record.category).or_insert(0.0) += record.amount;
        }

        let mut comparisons = Vec::with_capacity(plan.category_budgets.len());

        for (category, budget) in &plan.category_budgets {
            let actual = actuals.get(category).copied().unwrap_or(0.0);
            let accumulated = rollover.get(category).copied().unwrap_or(0.0);

            match build_comparison(*week, *category, actual, budget.weekly_target, accumulated) {
                Ok(comparison) => comparisons.push(comparison),
                Err(e) => {
                    warn!(week = %week, category = %category, "skipping category in comparison: {}", e);
                    self.notifier.error(&failure_message(&e, *category, week));
                }
            }
        }

        comparisons.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
        Ok(comparisons)
    }
}

fn build_comparison(
    week: WeekId,
    category: Category,
    actual: f64,
    target: f64,
    rollover_accumulated: f64,
) -> BudgetResult<WeeklyBudgetComparison> {
    for (field, value) in [
        ("actual", actual),
        ("target", target),
        ("rollover", rollover_accumulated),
    ] {
        if !value.is_finite() {
            return Err(BudgetError::InvalidNumber {
                category: category.to_string(),
                week: week.to_string(),
                field,
                value,
            });
        }
    }

    let effective_target = target + rollover_accumulated;
    let variance = actual - target;

    if !effective_target.is_finite() || !variance.is_finite() {
        return Err(BudgetError::Overflow {
            category: category.to_string(),
            week: week.to_string(),
        });
    }

    Ok(WeeklyBudgetComparison {
        week,
        category,
        actual,
        target,
        variance,
        rollover_accumulated,
        effective_target,
    })
}

fn failure_message(err: &BudgetError, category: Category, week: &WeekId) -> String {
    if err.is_overflow() {
        format!(
            "Arithmetic overflow while calculating the {} budget for {}. The category is hidden from this comparison.",
            category, week
        )
    } else {
        format!(
            "Invalid budget data for {} in {}. The category is hidden from this comparison.",
            category, week
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryBudget, QualifierBreakdown};
    use crate::notify::RecordingNotifier;
    use crate::services::calendar;

    fn week(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    fn record(w: &str, category: Category, amount: f64) -> WeeklyData {
        let id = week(w);
        let bounds = calendar::week_boundaries(&id).unwrap();
        WeeklyData::new(id, category, amount, QualifierBreakdown::default(), bounds)
    }

    #[test]
    fn test_category_without_spending_still_listed() {
        let notifier = RecordingNotifier::new();
        let plan = BudgetPlan::new().with_budget(Category::Groceries, CategoryBudget::new(-500.0, false));

        let result = ComparisonEngine::new(&notifier)
            .compare(&[], &plan, &week("2025-W05"))
            .unwrap();

        assert_eq!(result.len(), 1);
        let groceries = &result[0];
        assert_eq!(groceries.actual, 0.0);
        assert_eq!(groceries.target, -500.0);
        assert_eq!(groceries.variance, 500.0);
        assert_eq!(groceries.rollover_accumulated, 0.0);
        assert_eq!(groceries.effective_target, -500.0);
    }

    #[test]
    fn test_rollover_feeds_effective_target() {
        let notifier = RecordingNotifier::new();
        let plan = BudgetPlan::new()
            .with_budget(Category::Groceries, CategoryBudget::new(-500.0, true))
            .with_budget(Category::Dining, CategoryBudget::new(-100.0, false));
        let data = vec![
            record("2025-W02", Category::Groceries, -400.0),
            record("2025-W02", Category::Dining, -150.0),
            record("2025-W03", Category::Groceries, -450.0),
            record("2025-W03", Category::Dining, -90.0),
        ];

        let result = ComparisonEngine::new(&notifier)
            .compare(&data, &plan, &week("2025-W03"))
            .unwrap();

        assert_eq!(result.len(), 2);
        let dining = &result[0];
        assert_eq!(dining.category, Category::Dining);
        assert_eq!(dining.rollover_accumulated, 0.0);
        assert_eq!(dining.variance, 10.0);

        let groceries = &result[1];
        assert_eq!(groceries.actual, -450.0);
        assert_eq!(groceries.rollover_accumulated, 100.0);
        assert_eq!(groceries.effective_target, -400.0);
        assert_eq!(groceries.variance, 50.0);
    }

    #[test]
    fn test_invalid_category_is_skipped_others_survive() {
        let notifier = RecordingNotifier::new();
        let plan = BudgetPlan::new()
            .with_budget(Category::Groceries, CategoryBudget::new(f64::NAN, false))
            .with_budget(Category::Dining, CategoryBudget::new(-100.0, false));

        let result = ComparisonEngine::new(&notifier)
            .compare(&[], &plan, &week("2025-W05"))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::Dining);
        let errors = notifier.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid budget data for groceries"));
    }

    #[test]
    fn test_overflow_has_distinct_wording() {
        let notifier = RecordingNotifier::new();
        let plan = BudgetPlan::new()
            .with_budget(Category::Shopping, CategoryBudget::new(f64::MAX, false))
            .with_budget(Category::Dining, CategoryBudget::new(-100.0, false));
        let data = vec![record("2025-W05", Category::Shopping, -f64::MAX)];

        let result = ComparisonEngine::new(&notifier)
            .compare(&data, &plan, &week("2025-W05"))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, Category::Dining);
        assert!(notifier.errors()[0].starts_with("Arithmetic overflow"));
    }

    #[test]
    fn test_rollover_failure_propagates() {
        let notifier = RecordingNotifier::new();
        let plan = BudgetPlan::new().with_budget(Category::Groceries, CategoryBudget::new(-500.0, true));
        let data = vec![
            record("2025-W02", Category::Groceries, f64::NAN),
            record("2025-W03", Category::Groceries, -100.0),
        ];

        let result = ComparisonEngine::new(&notifier).compare(&data, &plan, &week("2025-W03"));

        assert!(result.is_err());
        assert_eq!(notifier.errors().len(), 1);
    }
}
