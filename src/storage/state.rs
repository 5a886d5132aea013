//! Persisted view state store
//!
//! The whole `BudgetState` lives as one JSON document under one key.
//! Loading never fails: each field is validated on its own and replaced
//! by its default when invalid. Saving merges a `StatePatch` and reads the
//! document back to confirm the budget plan survived.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetPlan, BudgetState, Category, CategoryBudget, StatePatch, ViewGranularity, ViewSelection,
    WeekId,
};
use crate::notify::Notifier;

use super::backend::StateBackend;

/// Key the state is stored under unless configured otherwise
pub const DEFAULT_STATE_KEY: &str = "budgetState";

/// Field name used by releases that supported a single selected category
const LEGACY_SELECTED_CATEGORY: &str = "selectedCategory";

/// Loads and saves `BudgetState`
pub struct StateStore<'a> {
    backend: &'a dyn StateBackend,
    notifier: &'a dyn Notifier,
    key: String,
}

impl<'a> StateStore<'a> {
    /// Create a store using the default key
    pub fn new(backend: &'a dyn StateBackend, notifier: &'a dyn Notifier) -> Self {
        Self {
            backend,
            notifier,
            key: DEFAULT_STATE_KEY.to_string(),
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Load the state, falling back to defaults field by field.
    ///
    /// Missing, unreadable or unparsable documents yield the default state
    /// and a warning.
    pub fn load(&self) -> BudgetState {
        match self.read_stored() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!(key = %self.key, "no saved state");
                self.notifier
                    .warn("No saved budget settings were found. Using defaults.");
                BudgetState::default()
            }
            Err(e) => {
                warn!(key = %self.key, "failed to read saved state: {}", e);
                self.notifier
                    .warn("Saved budget settings could not be read. Using defaults.");
                BudgetState::default()
            }
        }
    }

    /// Merge `patch` onto the current state and persist it.
    ///
    /// A missing document is merged onto defaults without a warning. A
    /// document that cannot be read aborts the save before anything is
    /// written. Failures are reported through the notifier (critical when
    /// the patch carries a budget plan) and returned to the caller.
    pub fn save(&self, patch: StatePatch) -> BudgetResult<BudgetState> {
        let plan_in_flight = patch.touches_budget_plan();

        let current = match self.read_stored() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!(key = %self.key, "failed to read state before saving: {}", e);
                self.report_save_failure(plan_in_flight, &e);
                return Err(e);
            }
        };
        let next = patch.apply(&current);

        match self.persist(&next) {
            Ok(()) => Ok(next),
            Err(e) => {
                warn!(key = %self.key, "failed to save state: {}", e);
                self.report_save_failure(plan_in_flight, &e);
                Err(e)
            }
        }
    }

    /// Read and validate the stored document.
    ///
    /// `Ok(None)` means nothing is stored. A corrupted document is reported
    /// and replaced by defaults; only a backend failure is an error.
    fn read_stored(&self) -> BudgetResult<Option<BudgetState>> {
        let raw = match self.backend.read(&self.key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let state = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => {
                let parsed = parse_state(&fields);
                if !parsed.discarded.is_empty() {
                    self.notifier.warn(&format!(
                        "Some saved budget settings were invalid and have been reset: {}",
                        parsed.discarded.join("; ")
                    ));
                }
                parsed.state
            }
            Ok(_) | Err(_) => {
                warn!(key = %self.key, "saved state is not a JSON object");
                self.notifier
                    .warn("Saved budget settings were corrupted. Using defaults.");
                BudgetState::default()
            }
        };
        Ok(Some(state))
    }

    fn report_save_failure(&self, plan_in_flight: bool, e: &BudgetError) {
        // The document is already written when only the read-back failed
        let written = matches!(e, BudgetError::Verification(_));
        match (plan_in_flight, written) {
            (true, true) => self.notifier.error(&format!(
                "Your budget plan was saved but could not be verified after saving ({}).",
                e
            )),
            (true, false) => self.notifier.error(&format!(
                "Your budget plan could not be saved ({}). Your changes were not kept.",
                e
            )),
            (false, true) => self.notifier.warn(&format!(
                "Your settings were saved but could not be verified after saving ({}).",
                e
            )),
            (false, false) => self
                .notifier
                .warn(&format!("Your settings could not be saved ({}).", e)),
        }
    }

    fn persist(&self, state: &BudgetState) -> BudgetResult<()> {
        let text = serde_json::to_string(state)?;
        self.backend.write(&self.key, &text)?;

        let reread = self
            .backend
            .read(&self.key)?
            .ok_or_else(|| BudgetError::Verification("state missing after write".to_string()))?;

        let stored_plan = match serde_json::from_str::<Value>(&reread) {
            Ok(Value::Object(fields)) => parse_state(&fields).state.budget_plan,
            _ => {
                return Err(BudgetError::Verification(
                    "saved state is not readable".to_string(),
                ))
            }
        };

        if stored_plan != state.budget_plan {
            return Err(BudgetError::Verification(
                "budget plan did not read back as saved".to_string(),
            ));
        }

        Ok(())
    }
}

/// Result of validating a stored document
struct ParsedState {
    state: BudgetState,
    /// User-visible settings that had to be dropped
    discarded: Vec<String>,
}

fn parse_state(fields: &Map<String, Value>) -> ParsedState {
    let mut discarded = Vec::new();

    let hidden_categories = parse_hidden_categories(fields);

    let show_vacation = match fields.get("showVacation") {
        Some(Value::Bool(b)) => *b,
        other => {
            log_default("showVacation", other);
            true
        }
    };

    let planning_mode = match fields.get("planningMode") {
        Some(Value::Bool(b)) => *b,
        other => {
            log_default("planningMode", other);
            false
        }
    };

    let budget_plan = match fields.get("budgetPlan") {
        None | Some(Value::Null) => None,
        Some(Value::Object(plan)) => Some(parse_plan(plan, &mut discarded)),
        Some(_) => {
            discarded.push("budget plan was not readable".to_string());
            None
        }
    };

    let granularity = match fields.get("viewGranularity") {
        Some(Value::String(s)) if s == "week" => ViewGranularity::Week,
        Some(Value::String(s)) if s == "month" => ViewGranularity::Month,
        other => {
            log_default("viewGranularity", other);
            ViewGranularity::Month
        }
    };

    let selected_week = match fields.get("selectedWeek") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match WeekId::parse(s) {
            Ok(week) => Some(week),
            Err(e) => {
                debug!("resetting selectedWeek: {}", e);
                None
            }
        },
        other => {
            log_default("selectedWeek", other);
            None
        }
    };

    // Month view never carries a selected week
    let view = match granularity {
        ViewGranularity::Month => ViewSelection::month(),
        ViewGranularity::Week => ViewSelection::week(selected_week),
    };

    ParsedState {
        state: BudgetState {
            hidden_categories,
            show_vacation,
            budget_plan,
            planning_mode,
            view,
        },
        discarded,
    }
}

fn parse_hidden_categories(fields: &Map<String, Value>) -> Vec<Category> {
    match fields.get("hiddenCategories") {
        Some(Value::Array(items)) => {
            let mut hidden = Vec::new();
            for item in items {
                match item.as_str().map(str::parse::<Category>) {
                    Some(Ok(category)) if !hidden.contains(&category) => hidden.push(category),
                    Some(Ok(_)) => {}
                    _ => debug!("dropping unknown hidden category {}", item),
                }
            }
            hidden
        }
        None => match fields.get(LEGACY_SELECTED_CATEGORY) {
            Some(Value::String(s)) => match s.parse::<Category>() {
                Ok(selected) => {
                    debug!("migrating legacy selected category {}", selected);
                    Category::all_except(selected)
                }
                Err(_) => Vec::new(),
            },
            _ => Vec::new(),
        },
        other => {
            log_default("hiddenCategories", other);
            Vec::new()
        }
    }
}

fn parse_plan(plan: &Map<String, Value>, discarded: &mut Vec<String>) -> BudgetPlan {
    let mut category_budgets = BTreeMap::new();

    match plan.get("categoryBudgets") {
        Some(Value::Object(entries)) => {
            for (name, entry) in entries {
                let Ok(category) = name.parse::<Category>() else {
                    discarded.push(format!("budget for unknown category '{}'", name));
                    continue;
                };
                match parse_category_budget(entry) {
                    Ok(budget) => {
                        category_budgets.insert(category, budget);
                    }
                    Err(reason) => discarded.push(format!("{} budget ({})", category, reason)),
                }
            }
        }
        None => {}
        Some(_) => discarded.push("category budgets were not readable".to_string()),
    }

    let last_modified = plan
        .get("lastModified")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| {
            debug!("budget plan has no valid lastModified; using now");
            Utc::now()
        });

    BudgetPlan {
        category_budgets,
        last_modified,
    }
}

fn parse_category_budget(entry: &Value) -> Result<CategoryBudget, String> {
    let weekly_target = entry
        .get("weeklyTarget")
        .and_then(Value::as_f64)
        .ok_or_else(|| "weekly target is not a number".to_string())?;
    let rollover_enabled = entry
        .get("rolloverEnabled")
        .and_then(Value::as_bool)
        .ok_or_else(|| "rollover flag is not a boolean".to_string())?;

    let budget = CategoryBudget::new(weekly_target, rollover_enabled);
    budget.validate().map_err(|e| e.to_string())?;
    Ok(budget)
}

fn log_default(field: &str, found: Option<&Value>) {
    if let Some(value) = found {
        debug!("resetting {} from invalid value {}", field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::backend::MemoryBackend;

    struct FailingBackend;

    impl StateBackend for FailingBackend {
        fn read(&self, _key: &str) -> BudgetResult<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> BudgetResult<()> {
            Err(BudgetError::Storage("quota exceeded".to_string()))
        }
    }

    /// Every read fails; writes are counted
    #[derive(Default)]
    struct UnreadableBackend {
        writes: std::cell::Cell<usize>,
    }

    impl StateBackend for UnreadableBackend {
        fn read(&self, _key: &str) -> BudgetResult<Option<String>> {
            Err(BudgetError::Storage("permission denied".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> BudgetResult<()> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    /// Accepts writes but drops the budget plan
    #[derive(Default)]
    struct LossyBackend {
        inner: MemoryBackend,
    }

    impl StateBackend for LossyBackend {
        fn read(&self, key: &str) -> BudgetResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> BudgetResult<()> {
            let mut doc: Value = serde_json::from_str(value)?;
            doc["budgetPlan"] = Value::Null;
            self.inner.write(key, &doc.to_string())
        }
    }

    fn week(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    fn load_raw(raw: &str) -> (BudgetState, RecordingNotifier) {
        let backend = MemoryBackend::new().with_entry(DEFAULT_STATE_KEY, raw);
        let notifier = RecordingNotifier::new();
        let state = StateStore::new(&backend, &notifier).load();
        (state, notifier)
    }

    #[test]
    fn test_missing_state_is_default() {
        let backend = MemoryBackend::new();
        let notifier = RecordingNotifier::new();
        let state = StateStore::new(&backend, &notifier).load();

        assert_eq!(state, BudgetState::default());
        assert_eq!(notifier.warnings().len(), 1);
        assert!(notifier.errors().is_empty());
    }

    #[test]
    fn test_corrupted_state_is_default() {
        let (state, notifier) = load_raw("{not json");
        assert_eq!(state, BudgetState::default());
        assert_eq!(notifier.warnings().len(), 1);

        let (state, _) = load_raw("[1, 2, 3]");
        assert_eq!(state, BudgetState::default());
    }

    #[test]
    fn test_fields_validated_independently() {
        let (state, _) = load_raw(
            r#"{
                "hiddenCategories": ["dining", "pets", "dining", 7],
                "showVacation": "yes",
                "budgetPlan": null,
                "viewGranularity": "fortnight",
                "selectedWeek": "2025-W10",
                "planningMode": true
            }"#,
        );

        assert_eq!(state.hidden_categories, vec![Category::Dining]);
        assert!(state.show_vacation);
        assert!(state.planning_mode);
        // Unknown granularity falls back to month, which drops the week
        assert_eq!(state.view, ViewSelection::Month);
    }

    #[test]
    fn test_week_view_with_malformed_week() {
        let (state, _) = load_raw(r#"{"viewGranularity": "week", "selectedWeek": "2025-10"}"#);
        assert_eq!(state.view, ViewSelection::week(None));

        let (state, _) = load_raw(r#"{"viewGranularity": "week", "selectedWeek": "2025-W10"}"#);
        assert_eq!(state.view, ViewSelection::week(Some(week("2025-W10"))));
    }

    #[test]
    fn test_legacy_selected_category_migrates() {
        let (state, _) = load_raw(r#"{"selectedCategory": "groceries", "showVacation": false}"#);

        assert_eq!(state.hidden_categories.len(), 11);
        assert!(!state.is_hidden(Category::Groceries));
        assert!(!state.show_vacation);

        // An explicit hidden list wins over the legacy field
        let (state, _) = load_raw(r#"{"selectedCategory": "groceries", "hiddenCategories": []}"#);
        assert!(state.hidden_categories.is_empty());
    }

    #[test]
    fn test_invalid_budget_entries_dropped_individually() {
        let (state, notifier) = load_raw(
            r#"{
                "budgetPlan": {
                    "categoryBudgets": {
                        "groceries": {"weeklyTarget": -500, "rolloverEnabled": true},
                        "dining": {"weeklyTarget": "lots", "rolloverEnabled": false},
                        "travel": {"weeklyTarget": -100, "rolloverEnabled": "no"},
                        "shopping": {"weeklyTarget": 5e12, "rolloverEnabled": false},
                        "pets": {"weeklyTarget": -10, "rolloverEnabled": false}
                    },
                    "lastModified": "2025-01-06T10:00:00Z"
                }
            }"#,
        );

        let plan = state.budget_plan.expect("plan kept");
        assert_eq!(plan.category_budgets.len(), 1);
        assert_eq!(
            plan.get(Category::Groceries),
            Some(&CategoryBudget::new(-500.0, true))
        );
        assert_eq!(plan.last_modified.to_rfc3339(), "2025-01-06T10:00:00+00:00");

        let warnings = notifier.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("dining"));
        assert!(warnings[0].contains("pets"));
    }

    #[test]
    fn test_save_month_clears_selected_week() {
        let backend = MemoryBackend::new();
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        let pinned = store
            .save(
                StatePatch::new()
                    .view_granularity(ViewGranularity::Week)
                    .selected_week(Some(week("2025-W10"))),
            )
            .unwrap();
        assert_eq!(pinned.view.selected_week(), Some(week("2025-W10")));

        let month = store
            .save(StatePatch::new().view_granularity(ViewGranularity::Month))
            .unwrap();
        assert_eq!(month.view.selected_week(), None);
        assert_eq!(store.load().view, ViewSelection::Month);
    }

    #[test]
    fn test_save_merges_and_persists_plan() {
        let backend = MemoryBackend::new();
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        let plan = BudgetPlan::new()
            .with_budget(Category::Groceries, CategoryBudget::new(-123.45, true))
            .with_budget(Category::Income, CategoryBudget::new(2000.1, false));

        store
            .save(StatePatch::new().budget_plan(Some(plan.clone())))
            .unwrap();
        let saved = store.save(StatePatch::new().planning_mode(true)).unwrap();

        assert!(saved.planning_mode);
        assert_eq!(saved.budget_plan, Some(plan.clone()));
        assert_eq!(store.load().budget_plan, Some(plan));
    }

    #[test]
    fn test_write_failure_with_plan_is_critical() {
        let backend = FailingBackend;
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);
        notifier.clear();

        let result = store.save(StatePatch::new().budget_plan(Some(BudgetPlan::new())));

        assert!(matches!(result, Err(BudgetError::Storage(_))));
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_write_failure_without_plan_is_warning() {
        let backend = FailingBackend;
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        let result = store.save(StatePatch::new().show_vacation(false));

        assert!(result.is_err());
        assert!(notifier.errors().is_empty());
        assert_eq!(notifier.warnings().len(), 1);
        assert!(notifier.warnings()[0].contains("could not be saved"));
    }

    #[test]
    fn test_save_on_fresh_store_is_silent() {
        let backend = MemoryBackend::new();
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        store.save(StatePatch::new().show_vacation(false)).unwrap();
        let plan = BudgetPlan::new().with_budget(Category::Dining, CategoryBudget::new(-50.0, false));
        store.save(StatePatch::new().budget_plan(Some(plan))).unwrap();

        assert!(notifier.warnings().is_empty());
        assert!(notifier.errors().is_empty());
    }

    #[test]
    fn test_unreadable_state_loads_defaults() {
        let backend = UnreadableBackend::default();
        let notifier = RecordingNotifier::new();

        let state = StateStore::new(&backend, &notifier).load();

        assert_eq!(state, BudgetState::default());
        assert_eq!(notifier.warnings().len(), 1);
        assert!(notifier.warnings()[0].contains("could not be read"));
        assert!(notifier.errors().is_empty());
    }

    #[test]
    fn test_unreadable_state_blocks_save() {
        let backend = UnreadableBackend::default();
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        let result = store.save(StatePatch::new().show_vacation(false));
        assert!(matches!(result, Err(BudgetError::Storage(_))));
        assert_eq!(notifier.warnings().len(), 1);

        let plan = BudgetPlan::new().with_budget(Category::Dining, CategoryBudget::new(-50.0, false));
        let result = store.save(StatePatch::new().budget_plan(Some(plan)));
        assert!(matches!(result, Err(BudgetError::Storage(_))));
        assert_eq!(notifier.errors().len(), 1);
        assert!(notifier.errors()[0].contains("not kept"));

        // Defaults were never written over the unreadable document
        assert_eq!(backend.writes.get(), 0);
    }

    #[test]
    fn test_plan_verification_mismatch() {
        let backend = LossyBackend::default();
        let notifier = RecordingNotifier::new();
        let store = StateStore::new(&backend, &notifier);

        let plan = BudgetPlan::new().with_budget(Category::Dining, CategoryBudget::new(-50.0, false));
        let result = store.save(StatePatch::new().budget_plan(Some(plan)));

        assert!(matches!(result, Err(BudgetError::Verification(_))));
        assert_eq!(notifier.errors().len(), 1);
        let errors = notifier.errors();
        assert!(errors[0].contains("could not be verified after saving"));
        assert!(!errors[0].contains("not kept"));
    }
}
