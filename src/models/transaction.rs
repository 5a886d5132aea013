//! Transaction model
//!
//! Transactions are read from an external store and never modified here.
//! Sign convention: positive amounts are income, negative amounts expenses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;

/// A single imported transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// External identifier
    pub id: String,

    /// Calendar date as written by the source ("YYYY-MM-DD")
    pub date: String,

    #[serde(default)]
    pub description: String,

    /// Signed amount (positive = income, negative = expense)
    pub amount: f64,

    pub category: Category,

    /// Credit-card rewards style spending that is partly paid back
    #[serde(default)]
    pub redeemable: bool,

    #[serde(default)]
    pub vacation: bool,

    /// Movement between own accounts; never counted
    #[serde(default)]
    pub transfer: bool,

    /// Fraction of a redeemable amount that counts, in [0, 1]
    #[serde(default)]
    pub redemption_rate: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_transaction_id: Option<String>,

    #[serde(default)]
    pub statement_ids: Vec<String>,
}

impl Transaction {
    /// Create a plain transaction with no qualifier flags set
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: f64,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            description: String::new(),
            amount,
            category,
            redeemable: false,
            vacation: false,
            transfer: false,
            redemption_rate: 0.0,
            linked_transaction_id: None,
            statement_ids: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark as redeemable at the given rate
    pub fn redeemable_at(mut self, rate: f64) -> Self {
        self.redeemable = true;
        self.redemption_rate = rate;
        self
    }

    /// Mark as vacation spending
    pub fn on_vacation(mut self) -> Self {
        self.vacation = true;
        self
    }

    /// Mark as a transfer between accounts
    pub fn as_transfer(mut self) -> Self {
        self.transfer = true;
        self
    }

    /// Check if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Validate fields the source schema constrains
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_finite() {
            return Err(TransactionValidationError::NonFiniteAmount(self.id.clone()));
        }

        if !(0.0..=1.0).contains(&self.redemption_rate) {
            return Err(TransactionValidationError::RedemptionRateOutOfRange {
                id: self.id.clone(),
                rate: self.redemption_rate,
            });
        }

        if self.redeemable && self.redemption_rate == 0.0 {
            return Err(TransactionValidationError::RedeemableWithoutRate(self.id.clone()));
        }

        if !self.redeemable && self.redemption_rate != 0.0 {
            return Err(TransactionValidationError::RateWithoutRedeemable {
                id: self.id.clone(),
                rate: self.redemption_rate,
            });
        }

        // Transfers never earn cashback
        if self.redeemable && self.transfer {
            return Err(TransactionValidationError::RedeemableTransfer(self.id.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} ({})",
            self.date, self.description, self.amount, self.category
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    NonFiniteAmount(String),
    RedemptionRateOutOfRange { id: String, rate: f64 },
    RedeemableWithoutRate(String),
    RateWithoutRedeemable { id: String, rate: f64 },
    RedeemableTransfer(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteAmount(id) => write!(f, "Transaction {} has a non-finite amount", id),
            Self::RedemptionRateOutOfRange { id, rate } => write!(
                f,
                "Transaction {} has redemption rate {} outside [0, 1]",
                id, rate
            ),
            Self::RedeemableWithoutRate(id) => write!(
                f,
                "Transaction {} is redeemable but has no redemption rate",
                id
            ),
            Self::RateWithoutRedeemable { id, rate } => write!(
                f,
                "Transaction {} has redemption rate {} but is not redeemable",
                id, rate
            ),
            Self::RedeemableTransfer(id) => write!(
                f,
                "Transaction {} is a transfer and cannot be redeemable",
                id
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_source_shape() {
        let json = r#"{
            "id": "t1",
            "date": "2025-01-06",
            "description": "Market",
            "amount": -42.5,
            "category": "groceries",
            "redeemable": true,
            "redemptionRate": 0.02,
            "statementIds": ["s1", "s2"]
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.category, Category::Groceries);
        assert!(txn.redeemable);
        assert!(!txn.vacation);
        assert!(!txn.transfer);
        assert_eq!(txn.redemption_rate, 0.02);
        assert_eq!(txn.statement_ids.len(), 2);
        assert!(txn.linked_transaction_id.is_none());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{"id":"t1","date":"2025-01-06","amount":1.0,"category":"pets"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_validation() {
        let txn = Transaction::new("t1", "2025-01-06", -10.0, Category::Dining);
        assert!(txn.validate().is_ok());

        let bad_rate = txn.clone().redeemable_at(1.5);
        assert!(matches!(
            bad_rate.validate(),
            Err(TransactionValidationError::RedemptionRateOutOfRange { .. })
        ));

        let mut bad_amount = txn.clone();
        bad_amount.amount = f64::INFINITY;
        assert!(bad_amount.validate().is_err());

        let mut no_rate = txn.clone();
        no_rate.redeemable = true;
        assert_eq!(
            no_rate.validate(),
            Err(TransactionValidationError::RedeemableWithoutRate("t1".to_string()))
        );

        let mut stray_rate = txn.clone();
        stray_rate.redemption_rate = 0.25;
        assert!(matches!(
            stray_rate.validate(),
            Err(TransactionValidationError::RateWithoutRedeemable { .. })
        ));

        let cashback_transfer = txn.redeemable_at(0.5).as_transfer();
        assert_eq!(
            cashback_transfer.validate(),
            Err(TransactionValidationError::RedeemableTransfer("t1".to_string()))
        );
    }

    #[test]
    fn test_is_income() {
        assert!(Transaction::new("a", "2025-01-01", 100.0, Category::Income).is_income());
        assert!(!Transaction::new("b", "2025-01-01", -1.0, Category::Other).is_income());
        assert!(!Transaction::new("c", "2025-01-01", 0.0, Category::Other).is_income());
    }
}
