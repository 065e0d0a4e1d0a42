//! tally-finance: category rules, aggregation and the statement report pipeline

pub mod aggregate;
pub mod category_rules;
pub mod report;
pub mod weekly;

pub use aggregate::{CategoryAggregate, Summary, category_breakdown, summarize};
pub use category_rules::{CategoryRule, CategoryRules, classify_category, classify_type};
pub use report::{PipelineConfig, ReportMetadata, StatementPipeline, StatementReport};
pub use weekly::{Series, WeeklySeries, weekly_series};
