//! Budget plan model and the records computed against it
//!
//! A plan holds one weekly target per category. Targets use the same sign
//! convention as transactions: an expense budget of 500 a week is stored
//! as `-500`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::category::Category;
use super::week::WeekId;

/// Largest accepted magnitude for a weekly target
pub const MAX_WEEKLY_TARGET: f64 = 1e9;

/// Budget settings for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    pub weekly_target: f64,
    pub rollover_enabled: bool,
}

impl CategoryBudget {
    pub fn new(weekly_target: f64, rollover_enabled: bool) -> Self {
        Self {
            weekly_target,
            rollover_enabled,
        }
    }

    /// Validate the target amount
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.weekly_target.is_finite() {
            return Err(BudgetValidationError::NonFiniteTarget);
        }
        if self.weekly_target.abs() > MAX_WEEKLY_TARGET {
            return Err(BudgetValidationError::TargetOutOfRange(self.weekly_target));
        }
        Ok(())
    }
}

/// Per-category weekly targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlan {
    /// Not every category needs an entry
    pub category_budgets: BTreeMap<Category, CategoryBudget>,
    pub last_modified: DateTime<Utc>,
}

impl BudgetPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self {
            category_budgets: BTreeMap::new(),
            last_modified: Utc::now(),
        }
    }

    /// Add or replace a category budget
    pub fn with_budget(mut self, category: Category, budget: CategoryBudget) -> Self {
        self.category_budgets.insert(category, budget);
        self
    }

    /// Set a category budget, bumping the modification time
    pub fn set(&mut self, category: Category, budget: CategoryBudget) {
        self.category_budgets.insert(category, budget);
        self.last_modified = Utc::now();
    }

    /// Remove a category budget, bumping the modification time
    pub fn remove(&mut self, category: Category) -> Option<CategoryBudget> {
        let removed = self.category_budgets.remove(&category);
        if removed.is_some() {
            self.last_modified = Utc::now();
        }
        removed
    }

    pub fn get(&self, category: Category) -> Option<&CategoryBudget> {
        self.category_budgets.get(&category)
    }

    /// Categories that carry unspent budget forward
    pub fn rollover_categories(&self) -> impl Iterator<Item = (Category, &CategoryBudget)> {
        self.category_budgets
            .iter()
            .filter(|(_, b)| b.rollover_enabled)
            .map(|(c, b)| (*c, b))
    }
}

impl Default for BudgetPlan {
    fn default() -> Self {
        Self::new()
    }
}

/// Budget versus actual for one category in one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBudgetComparison {
    pub week: WeekId,
    pub category: Category,
    pub actual: f64,
    pub target: f64,
    /// `actual - target`
    pub variance: f64,
    pub rollover_accumulated: f64,
    /// `target + rollover_accumulated`
    pub effective_target: f64,
}

impl fmt::Display for WeeklyBudgetComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: actual {:.2} / target {:.2} (variance {:.2}, rollover {:.2})",
            self.week,
            self.category,
            self.actual,
            self.target,
            self.variance,
            self.rollover_accumulated
        )
    }
}

/// Predicted weekly cash flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowPrediction {
    pub total_income_target: f64,
    /// Positive magnitude
    pub total_expense_target: f64,
    pub predicted_net_income: f64,
    pub historic_avg_income: f64,
    /// Positive magnitude
    pub historic_avg_expense: f64,
    pub variance: f64,
}

/// Validation errors for category budgets
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValidationError {
    NonFiniteTarget,
    TargetOutOfRange(f64),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteTarget => write!(f, "Weekly target must be a finite number"),
            Self::TargetOutOfRange(t) => write!(
                f,
                "Weekly target {} exceeds the allowed magnitude of {}",
                t, MAX_WEEKLY_TARGET
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
