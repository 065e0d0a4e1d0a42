//! Statement header fields (period, card number). Best effort: a field that
//! cannot be found is simply left out.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::StatementInfo;

fn period_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Statement Period:?\s*(.+)").expect("invalid period regex"))
}

fn card_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Card Number:?[ \t]*([X\d \t-]+)").expect("invalid card number regex")
    })
}

/// Extract header fields from the first page of a statement.
pub fn parse_statement_info(text: &str) -> StatementInfo {
    let statement_period = period_re()
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    let card_number = card_re()
        .captures(text)
        .map(|c| mask_card_number(c[1].trim()))
        .filter(|s| !s.is_empty());

    StatementInfo {
        statement_period,
        card_number,
    }
}

/// Replace every digit except the last four with `X`.
pub fn mask_card_number(raw: &str) -> String {
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    let mut seen = 0;
    raw.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen + 4 <= digits { 'X' } else { c }
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
