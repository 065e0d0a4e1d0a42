//! Totals and per-category breakdowns over classified transactions.
//!
//! Income is reported as a positive magnitude. All money values are rounded
//! to cents once, after summing.

use serde::{Deserialize, Serialize};
use tally_core::{Category, Transaction, TxnType, round_money};

/// Headline figures for a statement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

/// Transactions of one type grouped under one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: Category,
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub transactions: Vec<Transaction>,
}

pub fn summarize(txns: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut income_count = 0;
    let mut expense_count = 0;

    for t in txns {
        match t.txn_type() {
            TxnType::Income => {
                income += t.abs_amount();
                income_count += 1;
            }
            TxnType::Expense => {
                expense += t.abs_amount();
                expense_count += 1;
            }
        }
    }

    Summary {
        total_income: round_money(income),
        total_expense: round_money(expense),
        net_balance: round_money(income - expense),
        income_count,
        expense_count,
    }
}

/// Group the transactions of one type by category, largest total first.
/// Categories with equal totals keep the order they first appeared in.
pub fn category_breakdown(txns: &[Transaction], kind: TxnType) -> Vec<CategoryAggregate> {
    let mut groups: Vec<(Category, f64, Vec<Transaction>)> = Vec::new();

    for t in txns.iter().filter(|t| t.txn_type() == kind) {
        match groups.iter_mut().find(|(c, _, _)| *c == t.category()) {
            Some((_, total, items)) => {
                *total += t.abs_amount();
                items.push(t.clone());
            }
            None => groups.push((t.category(), t.abs_amount(), vec![t.clone()])),
        }
    }

    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    groups
        .into_iter()
        .map(|(category, total, transactions)| {
            let count = transactions.len();
            CategoryAggregate {
                category,
                total: round_money(total),
                count,
                // groups are only created with a first transaction
                average: round_money(total / count as f64),
                transactions,
            }
        })
        .collect()
}

/// Transactions of one type, in statement order
pub fn of_type(txns: &[Transaction], kind: TxnType) -> Vec<Transaction> {
    txns.iter().filter(|t| t.txn_type() == kind).cloned().collect()
}
