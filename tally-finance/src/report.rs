//! Statement pipeline: pages of text in, a complete report out.
//!
//! ```text
//! PDF -> pages -> parsed lines -> classified transactions -> aggregates
//! ```
//!
//! All behaviour is driven by the [`PipelineConfig`] handed to
//! [`StatementPipeline::new`]; nothing is read from global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::{SignConvention, Transaction, TxnType, WeekNumbering};
use tally_ingest::upload::path_basename;
use tally_ingest::{
    ParseStats, ParsedLine, StagedUpload, StatementError, StatementInfo, extract_pages_checked, parse_pages,
    parse_statement_info,
};
use tracing::{debug, info};

use crate::aggregate::{CategoryAggregate, Summary, category_breakdown, of_type, summarize};
use crate::category_rules::{CategoryRule, CategoryRules};
use crate::weekly::{WeeklySeries, weekly_series};

/// Classification and bucketing settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sign_convention: SignConvention,
    pub week_numbering: WeekNumbering,
    /// Replaces the built-in category rules when present; order is priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<CategoryRule>>,
}

/// Everything derived from one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementReport {
    pub statement_info: StatementInfo,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub income_transactions: Vec<Transaction>,
    pub expense_transactions: Vec<Transaction>,
    pub income_by_category: Vec<CategoryAggregate>,
    pub expense_by_category: Vec<CategoryAggregate>,
    pub weekly_series: WeeklySeries,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub parsed_at: DateTime<Utc>,
    /// Basename only; directories are never reported
    pub source_file: String,
    pub parse_stats: ParseStats,
}

#[derive(Debug, Clone)]
pub struct StatementPipeline {
    rules: CategoryRules,
    sign_convention: SignConvention,
    week_numbering: WeekNumbering,
}

impl Default for StatementPipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl StatementPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        let rules = match &config.rules {
            Some(rules) => CategoryRules::new(rules.clone()),
            None => CategoryRules::builtin(),
        };
        Self {
            rules,
            sign_convention: config.sign_convention,
            week_numbering: config.week_numbering,
        }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Attach type and category to a parsed line.
    pub fn classify(&self, line: &ParsedLine) -> Option<Transaction> {
        Transaction::new(
            line.date,
            line.description.as_str(),
            line.amount,
            self.sign_convention.classify(line.amount),
            self.rules.classify(&line.description),
        )
    }

    pub fn classify_all(&self, lines: &[ParsedLine]) -> Vec<Transaction> {
        lines.iter().filter_map(|l| self.classify(l)).collect()
    }

    /// Build the report from already extracted page text.
    pub fn build_report<S: AsRef<str>>(
        &self,
        pages: &[S],
        source_file: &str,
        parsed_at: DateTime<Utc>,
    ) -> Result<StatementReport, StatementError> {
        let Some(first_page) = pages.first() else {
            return Err(StatementError::EmptyDocument);
        };

        let statement_info = parse_statement_info(first_page.as_ref());
        let parsed = parse_pages(pages);
        let transactions = self.classify_all(&parsed.lines);
        debug!(transactions = transactions.len(), "classified transactions");

        Ok(StatementReport {
            statement_info,
            summary: summarize(&transactions),
            income_transactions: of_type(&transactions, TxnType::Income),
            expense_transactions: of_type(&transactions, TxnType::Expense),
            income_by_category: category_breakdown(&transactions, TxnType::Income),
            expense_by_category: category_breakdown(&transactions, TxnType::Expense),
            weekly_series: weekly_series(&transactions, self.week_numbering),
            transactions,
            metadata: ReportMetadata {
                parsed_at,
                source_file: source_file.to_string(),
                parse_stats: parsed.stats,
            },
        })
    }

    /// Extract and parse a statement PDF on disk.
    pub fn parse_statement(
        &self,
        path: impl AsRef<Path>,
        password: Option<&str>,
    ) -> Result<StatementReport, StatementError> {
        let path = path.as_ref();
        let pages = extract_pages_checked(path, password)?;
        let report = self.build_report(&pages, &path_basename(path), Utc::now())?;
        info!(
            source = %report.metadata.source_file,
            transactions = report.transactions.len(),
            "parsed statement"
        );
        Ok(report)
    }

    /// Parse uploaded bytes via a staged temporary file in `upload_dir`.
    /// The staged file is removed before this returns, on every path.
    pub fn parse_upload(
        &self,
        upload_dir: impl AsRef<Path>,
        filename: &str,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<StatementReport, StatementError> {
        let staged = StagedUpload::stage(upload_dir, filename, bytes)?;
        let pages = extract_pages_checked(staged.path(), password)?;
        self.build_report(&pages, staged.source_name(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use tally_core::Category;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_classify_line() {
        let pipeline = StatementPipeline::default();
        let line = ParsedLine {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "CARREFOUR DUBAI MALL".to_string(),
            amount: 125.5,
        };
        let t = pipeline.classify(&line).unwrap();
        assert_eq!(t.txn_type(), TxnType::Expense);
        assert_eq!(t.category(), Category::Shopping);
        assert_eq!(t.amount(), 125.5);
    }

    #[test]
    fn test_empty_page_list_is_error() {
        let pages: [&str; 0] = [];
        let err = StatementPipeline::default().build_report(&pages, "x.pdf", at()).unwrap_err();
        assert!(matches!(err, StatementError::EmptyDocument));
    }

    #[test]
    fn test_page_without_transactions_gives_empty_report() {
        let report = StatementPipeline::default()
            .build_report(&["Statement Period: Jan 2024\nThank you for banking with us"], "jan.pdf", at())
            .unwrap();
        assert!(report.transactions.is_empty());
        assert_eq!(report.summary.income_count + report.summary.expense_count, 0);
        assert_eq!(report.statement_info.statement_period.as_deref(), Some("Jan 2024"));
        assert_eq!(report.metadata.parse_stats.unmatched, 2);
    }

    #[test]
    fn test_credits_positive_convention_flips_types() {
        let config = PipelineConfig {
            sign_convention: SignConvention::CreditsPositive,
            ..Default::default()
        };
        let report = StatementPipeline::new(&config)
            .build_report(
                &["05/01/2024 TALABAT DELIVERY -45.00\n06/01/2024 SALARY CREDIT 5000.00"],
                "acct.pdf",
                at(),
            )
            .unwrap();
        assert_eq!(report.summary.total_income, 5000.0);
        assert_eq!(report.summary.total_expense, 45.0);
        assert_eq!(report.expense_transactions[0].description(), "TALABAT DELIVERY");
    }

    #[test]
    fn test_configured_rules_replace_builtin() {
        let config: PipelineConfig = serde_json::from_value(serde_json::json!({
            "rules": [
                { "category": "Subscription/Online", "keywords": ["openai"] }
            ]
        }))
        .unwrap();
        let pipeline = StatementPipeline::new(&config);
        assert_eq!(pipeline.rules().classify("OPENAI *CHATGPT"), Category::SubscriptionOnline);
        assert_eq!(pipeline.rules().classify("TALABAT"), Category::Others);
    }
}
