//! Transaction types produced by the statement pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified statement line. Built once by the pipeline, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    amount: f64,
    #[serde(rename = "type")]
    txn_type: TxnType,
    category: Category,
}

/// Income/expense flag derived from the sign of the amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxnType {
    Income,
    Expense,
}

/// Merchant categories, in rule priority order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    #[serde(rename = "Subscription/Online")]
    SubscriptionOnline,
    #[serde(rename = "Others")]
    Others,
}

/// Which sign a statement uses for money leaving the account.
///
/// Card statements print charges as positive and payments/refunds as
/// negative; most current-account exports do the opposite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SignConvention {
    /// Positive = charge (expense), zero or negative = credit (income)
    #[default]
    ChargesPositive,
    /// Negative = debit (expense), zero or positive = credit (income)
    CreditsPositive,
}

impl Category {
    /// Display label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::PersonalCare => "Personal Care",
            Category::SubscriptionOnline => "Subscription/Online",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TxnType {
    pub fn label(&self) -> &'static str {
        match self {
            TxnType::Income => "Income",
            TxnType::Expense => "Expense",
        }
    }
}

impl SignConvention {
    /// Classify an amount as income or expense. Depends on the sign only.
    pub fn classify(&self, amount: f64) -> TxnType {
        match self {
            SignConvention::ChargesPositive if amount > 0.0 => TxnType::Expense,
            SignConvention::ChargesPositive => TxnType::Income,
            SignConvention::CreditsPositive if amount < 0.0 => TxnType::Expense,
            SignConvention::CreditsPositive => TxnType::Income,
        }
    }
}

impl Transaction {
    /// Create a transaction. The amount is rounded to cents and the
    /// description trimmed; returns `None` if the description is blank.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        txn_type: TxnType,
        category: Category,
    ) -> Option<Self> {
        let description = description.into().trim().to_string();
        if description.is_empty() || !amount.is_finite() {
            return None;
        }
        Some(Self {
            date,
            description,
            amount: round_money(amount),
            txn_type,
            category,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Signed amount as printed on the statement
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn txn_type(&self) -> TxnType {
        self.txn_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_expense(&self) -> bool {
        self.txn_type == TxnType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.txn_type == TxnType::Income
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

/// Round a monetary value to two decimal places
pub fn round_money(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid serializing -0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_transaction_creation() {
        let txn = Transaction::new(
            date(),
            "  CARREFOUR DUBAI MALL ",
            125.504,
            TxnType::Expense,
            Category::Shopping,
        )
        .unwrap();
        assert_eq!(txn.description(), "CARREFOUR DUBAI MALL");
        assert_eq!(txn.amount(), 125.5);
        assert!(txn.is_expense());
        assert!(!txn.is_income());
    }

    #[test]
    fn test_blank_description_rejected() {
        assert!(Transaction::new(date(), "   ", 1.0, TxnType::Expense, Category::Others).is_none());
        assert!(Transaction::new(date(), "X", f64::NAN, TxnType::Expense, Category::Others).is_none());
    }

    #[test]
    fn test_charges_positive_convention() {
        let c = SignConvention::ChargesPositive;
        assert_eq!(c.classify(45.0), TxnType::Expense);
        assert_eq!(c.classify(0.01), TxnType::Expense);
        assert_eq!(c.classify(0.0), TxnType::Income);
        assert_eq!(c.classify(-5000.0), TxnType::Income);
    }

    #[test]
    fn test_credits_positive_convention() {
        let c = SignConvention::CreditsPositive;
        assert_eq!(c.classify(-45.0), TxnType::Expense);
        assert_eq!(c.classify(0.0), TxnType::Income);
        assert_eq!(c.classify(5000.0), TxnType::Income);
    }

    #[test]
    fn test_category_label_is_serialized_form() {
        for c in [Category::FoodDining, Category::PersonalCare, Category::SubscriptionOnline] {
            assert_eq!(serde_json::to_value(c).unwrap(), c.label());
            let back: Category = serde_json::from_value(serde_json::json!(c.label())).unwrap();
            assert_eq!(back, c);
        }
        assert!(serde_json::from_str::<Category>("\"Groceries\"").is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let txn = Transaction::new(date(), "TALABAT", 45.0, TxnType::Expense, Category::FoodDining).unwrap();
        let v = serde_json::to_value(&txn).unwrap();
        assert_eq!(v["date"], "2024-03-01");
        assert_eq!(v["type"], "Expense");
        assert_eq!(v["category"], "Food & Dining");
        assert_eq!(v["amount"], 45.0);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(4955.0000001), 4955.0);
        assert_eq!(round_money(-0.001), 0.0);
        assert_eq!(round_money(1.005 + 0.001), 1.01);
    }
}
