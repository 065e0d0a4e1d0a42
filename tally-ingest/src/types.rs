use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A statement line that matched the transaction pattern, before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub date: NaiveDate,
    /// Trimmed, never empty
    pub description: String,
    /// Signed amount exactly as printed, rounded to cents
    pub amount: f64,
}

/// Counters describing how lossy a parse was.
///
/// `lines == matched + unmatched + rejected`; blank lines are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub pages: usize,
    pub lines: usize,
    pub matched: usize,
    /// Lines that did not look like a transaction at all
    pub unmatched: usize,
    /// Lines that looked like a transaction but had a bad date or amount
    pub rejected: usize,
}

impl ParseStats {
    /// Lines examined that produced no transaction
    pub fn skipped(&self) -> usize {
        self.unmatched + self.rejected
    }
}

/// Best-effort header fields from the first statement page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_period: Option<String>,
    /// Masked: at most the last four digits remain visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
}

impl StatementInfo {
    pub fn is_empty(&self) -> bool {
        self.statement_period.is_none() && self.card_number.is_none()
    }
}
