//! Date utilities: statement date literals and week bucketing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by statement lines (`DD/MM/YYYY`)
pub const STATEMENT_DATE_FORMAT: &str = "%d/%m/%Y";

/// How dates are grouped into weeks for the weekly series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WeekNumbering {
    /// `%Y-W%U`: weeks start on Sunday, days before the first Sunday are week 00
    #[default]
    Sunday,
    /// `%G-W%V`: ISO 8601 weeks, Monday start, ISO week-year
    Iso,
}

impl WeekNumbering {
    fn pattern(&self) -> &'static str {
        match self {
            WeekNumbering::Sunday => "%Y-W%U",
            WeekNumbering::Iso => "%G-W%V",
        }
    }

    /// Week key for a date. Keys sort chronologically as plain strings.
    pub fn week_key(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Parse a `DD/MM/YYYY` literal, returning `None` for impossible dates.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), STATEMENT_DATE_FORMAT).ok()
}
