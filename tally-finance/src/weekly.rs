//! Weekly income/expense series for charting.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tally_core::{Transaction, TxnType, WeekNumbering, round_money};

/// One chart series: a value per week in [`WeeklySeries::weeks`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    /// Every week with activity, sorted
    pub weeks: Vec<String>,
    /// `Income` first, then `Expense - <category>` by category label
    pub series: Vec<Series>,
}

/// Bucket transactions by week. Every series is dense: one value per week,
/// zero where a week had no matching transactions.
pub fn weekly_series(txns: &[Transaction], numbering: WeekNumbering) -> WeeklySeries {
    let mut income: BTreeMap<String, f64> = BTreeMap::new();
    // category label -> week -> total
    let mut expense: BTreeMap<&'static str, BTreeMap<String, f64>> = BTreeMap::new();
    let mut weeks: BTreeSet<String> = BTreeSet::new();

    for t in txns {
        let week = numbering.week_key(t.date());
        weeks.insert(week.clone());
        match t.txn_type() {
            TxnType::Income => *income.entry(week).or_default() += t.abs_amount(),
            TxnType::Expense => {
                *expense
                    .entry(t.category().label())
                    .or_default()
                    .entry(week)
                    .or_default() += t.abs_amount();
            }
        }
    }

    let weeks: Vec<String> = weeks.into_iter().collect();
    let dense = |buckets: &BTreeMap<String, f64>| -> Vec<f64> {
        weeks
            .iter()
            .map(|w| round_money(buckets.get(w).copied().unwrap_or(0.0)))
            .collect()
    };

    let mut series = Vec::with_capacity(expense.len() + 1);
    series.push(Series {
        name: TxnType::Income.label().to_string(),
        data: dense(&income),
    });
    for (label, buckets) in &expense {
        series.push(Series {
            name: format!("{} - {}", TxnType::Expense.label(), label),
            data: dense(buckets),
        });
    }

    WeeklySeries { weeks, series }
}
