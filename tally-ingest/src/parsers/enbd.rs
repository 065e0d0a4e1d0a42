//! Emirates NBD credit card statement parser (text)
//!
//! Expected rows after PDF-to-text, one transaction per line:
//!   01/03/2024  02/03/2024  CARREFOUR DUBAI MALL                 125.50
//!   06/01/2024  SALARY CREDIT                                 -5,000.00
//!
//! The layout varies between statement generations, so rows are matched with
//! a single permissive pattern: a DD/MM/YYYY date, a description starting with
//! an upper-case letter, and a trailing amount. Some real rows will be missed
//! and some header rows may match; both are accepted losses.

use regex::Regex;
use std::sync::OnceLock;
use tally_core::parse_statement_date;
use tally_core::round_money;
use tracing::{debug, info, trace, warn};

use crate::types::{ParseStats, ParsedLine};

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<date>\d{2}/\d{2}/\d{4})",
            r".+?",
            r"(?P<desc>[A-Z].+?)\s+",
            r"(?P<amount>[-\d,.]+)$"
        ))
        .expect("invalid statement line regex")
    })
}

/// What became of a single line of page text
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Blank,
    Unmatched,
    /// Matched the row pattern but the date or amount did not convert
    Rejected(&'static str),
    Parsed(ParsedLine),
}

/// Classify one line of statement text.
pub fn parse_line(line: &str) -> LineOutcome {
    let line = line.trim_end();
    if line.trim_start().is_empty() {
        return LineOutcome::Blank;
    }

    let Some(caps) = line_re().captures(line) else {
        return LineOutcome::Unmatched;
    };

    let Some(date) = parse_statement_date(&caps["date"]) else {
        return LineOutcome::Rejected("invalid date");
    };

    let amount = match parse_amount(&caps["amount"]) {
        Some(a) => a,
        None => return LineOutcome::Rejected("invalid amount"),
    };

    LineOutcome::Parsed(ParsedLine {
        date,
        description: caps["desc"].trim().to_string(),
        amount,
    })
}

/// Parse an amount token such as `-5,000.00`, rounded to cents.
fn parse_amount(raw: &str) -> Option<f64> {
    let amount: f64 = raw.replace(',', "").parse().ok()?;
    amount.is_finite().then(|| round_money(amount))
}

/// Lazily yield the transactions on one page, skipping everything else.
pub fn transactions(text: &str) -> impl Iterator<Item = ParsedLine> + '_ {
    text.lines().filter_map(|line| match parse_line(line) {
        LineOutcome::Parsed(parsed) => Some(parsed),
        _ => None,
    })
}

/// Result of parsing every page of a statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPages {
    pub lines: Vec<ParsedLine>,
    pub stats: ParseStats,
}

/// Parse all pages in order, counting the lines that were skipped.
pub fn parse_pages<S: AsRef<str>>(pages: &[S]) -> ParsedPages {
    let mut out = ParsedPages::default();

    for (page_idx, page) in pages.iter().enumerate() {
        out.stats.pages += 1;
        for line in page.as_ref().lines() {
            match parse_line(line) {
                LineOutcome::Blank => {}
                LineOutcome::Unmatched => {
                    out.stats.lines += 1;
                    out.stats.unmatched += 1;
                    trace!(page = page_idx + 1, line, "no transaction pattern");
                }
                LineOutcome::Rejected(reason) => {
                    out.stats.lines += 1;
                    out.stats.rejected += 1;
                    debug!(page = page_idx + 1, line, reason, "skipping transaction-like line");
                }
                LineOutcome::Parsed(parsed) => {
                    out.stats.lines += 1;
                    out.stats.matched += 1;
                    out.lines.push(parsed);
                }
            }
        }
    }

    if out.lines.is_empty() && out.stats.lines > 0 {
        warn!(lines = out.stats.lines, "no transaction rows recognised");
    }
    info!(
        pages = out.stats.pages,
        matched = out.stats.matched,
        skipped = out.stats.skipped(),
        "parsed statement lines"
    );
    out
}
