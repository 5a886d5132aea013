//! Transaction category model
//!
//! Categories form a closed set shared by transactions, budget plans and
//! the persisted view state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BudgetError;

/// A spending or income category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Income,
    Housing,
    Utilities,
    Groceries,
    Dining,
    Transportation,
    Healthcare,
    Entertainment,
    Shopping,
    Travel,
    Investment,
    Other,
}

impl Category {
    /// Every category, in canonical order
    pub fn all() -> &'static [Category] {
        &[
            Category::Income,
            Category::Housing,
            Category::Utilities,
            Category::Groceries,
            Category::Dining,
            Category::Transportation,
            Category::Healthcare,
            Category::Entertainment,
            Category::Shopping,
            Category::Travel,
            Category::Investment,
            Category::Other,
        ]
    }

    /// The serialized name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "income",
            Category::Housing => "housing",
            Category::Utilities => "utilities",
            Category::Groceries => "groceries",
            Category::Dining => "dining",
            Category::Transportation => "transportation",
            Category::Healthcare => "healthcare",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Travel => "travel",
            Category::Investment => "investment",
            Category::Other => "other",
        }
    }

    /// All categories except the given one
    pub fn all_except(keep: Category) -> Vec<Category> {
        Self::all().iter().copied().filter(|c| *c != keep).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| BudgetError::Validation(format!("Unknown category: {}", s)))
    }
}
