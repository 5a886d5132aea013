//! Transaction inclusion rules and qualifier sub-totals
//!
//! Qualifiers (redeemable, vacation) split a group's total into
//! sub-totals without changing which group a transaction lands in.

use crate::models::{BudgetState, Category, QualifierBreakdown, Transaction};

/// Which transactions count toward aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilters {
    pub hidden_categories: Vec<Category>,
    pub show_vacation: bool,
}

impl Default for TransactionFilters {
    fn default() -> Self {
        Self {
            hidden_categories: Vec::new(),
            show_vacation: true,
        }
    }
}

impl TransactionFilters {
    /// Filters carried by the persisted view state
    pub fn from_state(state: &BudgetState) -> Self {
        Self {
            hidden_categories: state.hidden_categories.clone(),
            show_vacation: state.show_vacation,
        }
    }

    /// Check if a single transaction passes
    pub fn includes(&self, txn: &Transaction) -> bool {
        if txn.transfer {
            return false;
        }
        if txn.vacation && !self.show_vacation {
            return false;
        }
        !self.hidden_categories.contains(&txn.category)
    }
}

/// Transactions that pass the filters, in input order
pub fn filter<'a>(transactions: &'a [Transaction], filters: &TransactionFilters) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| filters.includes(t)).collect()
}

/// The amount a transaction contributes to aggregates
pub fn display_amount(txn: &Transaction) -> f64 {
    if txn.redeemable {
        txn.amount * txn.redemption_rate
    } else {
        txn.amount
    }
}

/// Add one transaction's display amount to a breakdown
pub fn accumulate(breakdown: &mut QualifierBreakdown, txn: &Transaction, display_amount: f64) {
    if txn.redeemable {
        breakdown.redeemable += display_amount;
    } else {
        breakdown.non_redeemable += display_amount;
    }

    if txn.vacation {
        breakdown.vacation += display_amount;
    } else {
        breakdown.non_vacation += display_amount;
    }

    breakdown.transaction_count += 1;
}
