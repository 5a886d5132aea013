//! Persisted application state
//!
//! The view granularity and the selected week are one value: a month view
//! has no selected week, and a week view has either a pinned week or none
//! (meaning "follow the current week").

use serde::{Deserialize, Serialize};

use super::budget::BudgetPlan;
use super::category::Category;
use super::week::WeekId;
use crate::services::calendar;

/// Granularity name as persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewGranularity {
    Week,
    #[default]
    Month,
}

/// Which period the UI shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewSelection {
    #[default]
    Month,
    Week { selected_week: Option<WeekId> },
}

impl ViewSelection {
    /// Month view
    pub fn month() -> Self {
        Self::Month
    }

    /// Week view, pinned to a week or following the current one
    pub fn week(selected_week: Option<WeekId>) -> Self {
        Self::Week { selected_week }
    }

    /// Week view following the live current week
    pub fn current_week() -> Self {
        Self::Week {
            selected_week: None,
        }
    }

    pub fn granularity(&self) -> ViewGranularity {
        match self {
            Self::Month => ViewGranularity::Month,
            Self::Week { .. } => ViewGranularity::Week,
        }
    }

    /// The pinned week; always `None` in month view
    pub fn selected_week(&self) -> Option<WeekId> {
        match self {
            Self::Month => None,
            Self::Week { selected_week } => *selected_week,
        }
    }
}

/// UI state persisted under a single key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "StateDocument")]
pub struct BudgetState {
    pub hidden_categories: Vec<Category>,
    pub show_vacation: bool,
    pub budget_plan: Option<BudgetPlan>,
    pub planning_mode: bool,
    pub view: ViewSelection,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            hidden_categories: Vec::new(),
            show_vacation: true,
            budget_plan: None,
            planning_mode: false,
            view: ViewSelection::Month,
        }
    }
}

impl BudgetState {
    /// The week the UI should show right now.
    ///
    /// An unpinned week view resolves to today's week on every call.
    pub fn effective_week(&self) -> Option<WeekId> {
        match self.view {
            ViewSelection::Month => None,
            ViewSelection::Week {
                selected_week: Some(week),
            } => Some(week),
            ViewSelection::Week {
                selected_week: None,
            } => calendar::current_week().ok(),
        }
    }

    pub fn is_hidden(&self, category: Category) -> bool {
        self.hidden_categories.contains(&category)
    }
}

/// On-disk shape of `BudgetState`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub hidden_categories: Vec<Category>,
    pub show_vacation: bool,
    pub budget_plan: Option<BudgetPlan>,
    pub view_granularity: ViewGranularity,
    pub selected_week: Option<WeekId>,
    pub planning_mode: bool,
}

impl From<BudgetState> for StateDocument {
    fn from(state: BudgetState) -> Self {
        Self {
            hidden_categories: state.hidden_categories,
            show_vacation: state.show_vacation,
            budget_plan: state.budget_plan,
            view_granularity: state.view.granularity(),
            selected_week: state.view.selected_week(),
            planning_mode: state.planning_mode,
        }
    }
}

/// Partial update applied by `StateStore::save`.
///
/// `None` leaves a field untouched. For nullable fields the inner option
/// is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub hidden_categories: Option<Vec<Category>>,
    pub show_vacation: Option<bool>,
    pub budget_plan: Option<Option<BudgetPlan>>,
    pub planning_mode: Option<bool>,
    pub view_granularity: Option<ViewGranularity>,
    pub selected_week: Option<Option<WeekId>>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden_categories(mut self, categories: Vec<Category>) -> Self {
        self.hidden_categories = Some(categories);
        self
    }

    pub fn show_vacation(mut self, show: bool) -> Self {
        self.show_vacation = Some(show);
        self
    }

    pub fn budget_plan(mut self, plan: Option<BudgetPlan>) -> Self {
        self.budget_plan = Some(plan);
        self
    }

    pub fn planning_mode(mut self, on: bool) -> Self {
        self.planning_mode = Some(on);
        self
    }

    pub fn view_granularity(mut self, granularity: ViewGranularity) -> Self {
        self.view_granularity = Some(granularity);
        self
    }

    pub fn selected_week(mut self, week: Option<WeekId>) -> Self {
        self.selected_week = Some(week);
        self
    }

    /// Whether this patch carries a budget plan (including clearing it)
    pub fn touches_budget_plan(&self) -> bool {
        self.budget_plan.is_some()
    }

    /// Merge onto `current`, re-deriving the view through its constructors
    pub fn apply(self, current: &BudgetState) -> BudgetState {
        let granularity = self
            .view_granularity
            .unwrap_or_else(|| current.view.granularity());

        let view = match granularity {
            ViewGranularity::Month => ViewSelection::month(),
            ViewGranularity::Week => {
                let selected = match self.selected_week {
                    Some(week) => week,
                    None => current.view.selected_week(),
                };
                ViewSelection::week(selected)
            }
        };

        BudgetState {
            hidden_categories: self
                .hidden_categories
                .unwrap_or_else(|| current.hidden_categories.clone()),
            show_vacation: self.show_vacation.unwrap_or(current.show_vacation),
            budget_plan: match self.budget_plan {
                Some(plan) => plan,
                None => current.budget_plan.clone(),
            },
            planning_mode: self.planning_mode.unwrap_or(current.planning_mode),
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_state() {
        let state = BudgetState::default();
        assert!(state.hidden_categories.is_empty());
        assert!(state.show_vacation);
        assert!(state.budget_plan.is_none());
        assert!(!state.planning_mode);
        assert_eq!(state.view, ViewSelection::Month);
        assert_eq!(state.effective_week(), None);
    }

    #[test]
    fn test_month_patch_clears_selected_week() {
        let current = BudgetState {
            view: ViewSelection::week(Some(week("2025-W10"))),
            ..BudgetState::default()
        };
        let next = StatePatch::new()
            .view_granularity(ViewGranularity::Month)
            .selected_week(Some(week("2025-W11")))
            .apply(&current);
        assert_eq!(next.view, ViewSelection::Month);
        assert_eq!(next.view.selected_week(), None);
    }

    #[test]
    fn test_week_patch_keeps_pinned_week() {
        let current = BudgetState {
            view: ViewSelection::week(Some(week("2025-W10"))),
            ..BudgetState::default()
        };
        let next = StatePatch::new().show_vacation(false).apply(&current);
        assert_eq!(next.view.selected_week(), Some(week("2025-W10")));
        assert!(!next.show_vacation);
    }

    #[test]
    fn test_selected_week_alone_in_month_view_is_dropped() {
        let next = StatePatch::new()
            .selected_week(Some(week("2025-W10")))
            .apply(&BudgetState::default());
        assert_eq!(next.view, ViewSelection::Month);
    }

    #[test]
    fn test_unpinned_week_follows_today() {
        let state = BudgetState {
            view: ViewSelection::current_week(),
            ..BudgetState::default()
        };
        assert_eq!(state.effective_week(), calendar::current_week().ok());
    }

    #[test]
    fn test_document_shape() {
        let state = BudgetState {
            view: ViewSelection::week(Some(week("2025-W03"))),
            ..BudgetState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["viewGranularity"], "week");
        assert_eq!(value["selectedWeek"], "2025-W03");
        assert_eq!(value["budgetPlan"], serde_json::Value::Null);
        assert_eq!(value["showVacation"], true);

        let month = serde_json::to_value(BudgetState::default()).unwrap();
        assert_eq!(month["viewGranularity"], "month");
        assert_eq!(month["selectedWeek"], serde_json::Value::Null);
    }
}
