//! Weekly aggregation
//!
//! Groups filtered transactions by (ISO week, category). Weeks that cannot
//! be resolved are dropped as a whole; the rest of the data still comes
//! through. Output is rebuilt from scratch on every call.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::models::{Category, QualifierBreakdown, Transaction, WeekBounds, WeekId, WeeklyData};
use crate::notify::Notifier;
use crate::services::calendar;
use crate::services::qualifier::{self, TransactionFilters};

/// Running totals for one (week, category) group
struct Group<'t> {
    amount: f64,
    qualifiers: QualifierBreakdown,
    first_date: NaiveDate,
    last_date: NaiveDate,
    transactions: Vec<&'t Transaction>,
}

impl<'t> Group<'t> {
    fn new(date: NaiveDate) -> Self {
        Self {
            amount: 0.0,
            qualifiers: QualifierBreakdown::default(),
            first_date: date,
            last_date: date,
            transactions: Vec::new(),
        }
    }

    fn add(&mut self, txn: &'t Transaction, date: NaiveDate) {
        let amount = qualifier::display_amount(txn);
        self.amount += amount;
        qualifier::accumulate(&mut self.qualifiers, txn, amount);
        self.first_date = self.first_date.min(date);
        self.last_date = self.last_date.max(date);
        self.transactions.push(txn);
    }
}

/// Service for building weekly aggregates
pub struct WeeklyAggregator<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> WeeklyAggregator<'a> {
    /// Create a new aggregator reporting through `notifier`
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    /// Aggregate transactions into one record per (week, category),
    /// sorted by week then category name.
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        filters: &TransactionFilters,
    ) -> Vec<WeeklyData> {
        let included = qualifier::filter(transactions, filters);

        let mut groups: BTreeMap<(WeekId, Category), Group<'_>> = BTreeMap::new();
        // Unresolvable week label -> transactions lost with it
        let mut skipped: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();

        for txn in included {
            let resolved = calendar::parse_date(&txn.date)
                .and_then(|date| calendar::week_of(date).map(|week| (date, week)));

            match resolved {
                Ok((date, week)) => groups
                    .entry((week, txn.category))
                    .or_insert_with(|| Group::new(date))
                    .add(txn, date),
                Err(e) => {
                    warn!(transaction = %txn.id, date = %txn.date, "cannot place transaction in a week: {}", e);
                    skipped.entry(txn.date.clone()).or_default().push(txn);
                }
            }
        }

        let weeks: BTreeSet<WeekId> = groups.keys().map(|(week, _)| *week).collect();
        let mut bounds: HashMap<WeekId, WeekBounds> = HashMap::new();

        for week in weeks {
            match calendar::week_boundaries(&week) {
                Ok(b) => {
                    bounds.insert(week, b);
                }
                Err(e) => {
                    let lost: Vec<&Transaction> = groups
                        .iter()
                        .filter(|((w, _), _)| *w == week)
                        .flat_map(|(_, g)| g.transactions.iter().copied())
                        .collect();
                    for txn in &lost {
                        warn!(transaction = %txn.id, week = %week, "dropping transaction: {}", e);
                    }
                    skipped.entry(week.to_string()).or_default().extend(lost);
                }
            }
        }

        let mut result = Vec::with_capacity(groups.len());

        for ((week, category), group) in groups {
            let Some(week_bounds) = bounds.get(&week) else {
                continue;
            };

            let record = WeeklyData::new(week, category, group.amount, group.qualifiers, *week_bounds);

            if let Err(reason) = check_consistency(&record, &group) {
                error!(week = %week, category = %category, "dropping inconsistent weekly record: {}", reason);
                continue;
            }

            result.push(record);
        }

        if !skipped.is_empty() {
            self.report_skipped(&skipped, bounds.is_empty());
        }

        result.sort_by(|a, b| {
            a.week
                .cmp(&b.week)
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });

        debug!(records = result.len(), skipped_weeks = skipped.len(), "aggregation complete");
        result
    }

    fn report_skipped(&self, skipped: &BTreeMap<String, Vec<&Transaction>>, nothing_left: bool) {
        let transaction_count: usize = skipped.values().map(Vec::len).sum();

        if nothing_left {
            self.notifier.error(&format!(
                "Unable to process any transactions: all {} week(s) had invalid dates. \
                 The weekly budget view is unavailable until the data is corrected.",
                skipped.len()
            ));
        } else {
            let labels: Vec<&str> = skipped.keys().map(String::as_str).collect();
            self.notifier.warn(&format!(
                "Skipped {} transaction(s) in {} week(s) with invalid dates: {}",
                transaction_count,
                skipped.len(),
                labels.join(", ")
            ));
        }
    }
}

fn check_consistency(record: &WeeklyData, group: &Group<'_>) -> Result<(), String> {
    if !record.amount.is_finite() {
        return Err(format!("amount {} is not finite", record.amount));
    }

    let bounds = record.bounds();
    if !bounds.contains(group.first_date) || !bounds.contains(group.last_date) {
        return Err(format!(
            "transaction dates {}..{} fall outside {}..{}",
            group.first_date, group.last_date, bounds.start, bounds.end
        ));
    }

    if record.qualifiers.transaction_count == 0 {
        return Err("record has no transactions".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn week(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    #[test]
    fn test_two_weeks_two_records() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-01-06", -100.0, Category::Groceries),
            Transaction::new("b", "2025-01-13", -50.0, Category::Groceries),
        ];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].week, week("2025-W02"));
        assert_eq!(data[0].amount, -100.0);
        assert_eq!(data[1].week, week("2025-W03"));
        assert_eq!(data[1].amount, -50.0);
        assert!(!data[0].is_income);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_redemption_adjusts_amount() {
        let notifier = RecordingNotifier::new();
        let txns = vec![Transaction::new("a", "2025-01-06", -100.0, Category::Shopping).redeemable_at(0.5)];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].amount, -50.0);
        assert_eq!(data[0].qualifiers.redeemable, -50.0);
        assert_eq!(data[0].qualifiers.non_redeemable, 0.0);
    }

    #[test]
    fn test_groups_within_week_and_sorts_by_category_name() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-01-08", -30.0, Category::Transportation),
            Transaction::new("b", "2025-01-06", 2000.0, Category::Income),
            Transaction::new("c", "2025-01-12", -20.0, Category::Dining),
            Transaction::new("d", "2025-01-07", -15.0, Category::Dining),
        ];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        let categories: Vec<&str> = data.iter().map(|d| d.category.as_str()).collect();
        assert_eq!(categories, vec!["dining", "income", "transportation"]);
        assert_eq!(data[0].amount, -35.0);
        assert_eq!(data[0].qualifiers.transaction_count, 2);
        assert!(data[1].is_income);
        for record in &data {
            assert_eq!(record.week_start, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
            assert_eq!(record.week_end, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
        }
    }

    #[test]
    fn test_filters_applied() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-01-06", -100.0, Category::Travel).on_vacation(),
            Transaction::new("b", "2025-01-06", -500.0, Category::Other).as_transfer(),
            Transaction::new("c", "2025-01-06", -10.0, Category::Dining),
        ];
        let filters = TransactionFilters {
            hidden_categories: vec![Category::Dining],
            show_vacation: false,
        };

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &filters);
        assert!(data.is_empty());
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_partial_bad_dates_warn() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-01-06", -100.0, Category::Groceries),
            Transaction::new("b", "2025-02-31", -50.0, Category::Groceries),
        ];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        assert_eq!(data.len(), 1);
        assert!(notifier.errors().is_empty());
        let warnings = notifier.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2025-02-31"));
        assert!(warnings[0].contains("1 transaction"));
    }

    #[test]
    fn test_all_bad_dates_are_critical() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-02-30", -100.0, Category::Groceries),
            Transaction::new("b", "yesterday", -50.0, Category::Dining),
        ];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        assert!(data.is_empty());
        assert!(notifier.warnings().is_empty());
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_non_finite_amount_record_dropped() {
        let notifier = RecordingNotifier::new();
        let txns = vec![
            Transaction::new("a", "2025-01-06", f64::NAN, Category::Groceries),
            Transaction::new("b", "2025-01-06", -10.0, Category::Dining),
        ];

        let data = WeeklyAggregator::new(&notifier).aggregate(&txns, &TransactionFilters::default());

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].category, Category::Dining);
    }

    #[test]
    fn test_empty_input() {
        let notifier = RecordingNotifier::new();
        let data = WeeklyAggregator::new(&notifier).aggregate(&[], &TransactionFilters::default());
        assert!(data.is_empty());
        assert!(notifier.is_empty());
    }
}
