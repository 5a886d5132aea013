//! Cumulative rollover across weeks
//!
//! Walks the weeks that have data, oldest first, carrying each
//! rollover-enabled category's weekly variance forward. Any invalid
//! number aborts the whole computation: callers never see a partially
//! accumulated map.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, Category, WeekId, WeeklyData};
use crate::notify::Notifier;

/// Accumulated rollover per rollover-enabled category
pub type RolloverMap = BTreeMap<Category, f64>;

/// Service computing accumulated over/under-spend
pub struct RolloverEngine<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> RolloverEngine<'a> {
    /// Create a new rollover engine reporting through `notifier`
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    /// Sum `actual - target` over the data weeks in `[from_week, to_week)`.
    ///
    /// Only categories with rollover enabled appear in the result, each
    /// starting at zero.
    pub fn rollover(
        &self,
        weekly_data: &[WeeklyData],
        plan: &BudgetPlan,
        from_week: &WeekId,
        to_week: &WeekId,
    ) -> BudgetResult<RolloverMap> {
        let mut totals: RolloverMap = plan.rollover_categories().map(|(c, _)| (c, 0.0)).collect();

        if from_week >= to_week || totals.is_empty() {
            return Ok(totals);
        }

        let mut actuals: HashMap<(WeekId, Category), f64> = HashMap::new();
        for record in weekly_data {
            *actuals.entry((record.week, record.category)).or_insert(0.0) += record.amount;
        }

        let weeks: BTreeSet<WeekId> = weekly_data
            .iter()
            .map(|d| d.week)
            .filter(|w| w >= from_week && w < to_week)
            .collect();

        for week in &weeks {
            for (category, budget) in plan.rollover_categories() {
                let actual = actuals.get(&(*week, category)).copied().unwrap_or(0.0);
                let target = budget.weekly_target;

                self.ensure_finite(category, week, "actual", actual)?;
                self.ensure_finite(category, week, "target", target)?;

                let running = totals.entry(category).or_insert(0.0);
                let next = *running + (actual - target);

                if !next.is_finite() {
                    self.notifier.error(&format!(
                        "Rollover for {} overflowed in week {}. Consider resetting your budget plan.",
                        category, week
                    ));
                    return Err(BudgetError::Overflow {
                        category: category.to_string(),
                        week: week.to_string(),
                    });
                }

                *running = next;
            }
        }

        debug!(from = %from_week, to = %to_week, weeks = weeks.len(), "rollover computed");
        Ok(totals)
    }

    fn ensure_finite(
        &self,
        category: Category,
        week: &WeekId,
        field: &'static str,
        value: f64,
    ) -> BudgetResult<()> {
        if value.is_finite() {
            return Ok(());
        }

        self.notifier.error(&format!(
            "Invalid budget data for {} in week {}: {} is not a finite number. Rollover could not be calculated.",
            category, week, field
        ));
        Err(BudgetError::InvalidNumber {
            category: category.to_string(),
            week: week.to_string(),
            field,
            value,
        })
    }
}
