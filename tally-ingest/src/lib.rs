//! tally-ingest: PDF text extraction and statement line parsing.

pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod parsers;
pub mod pdf;
pub mod statement_info;
pub mod types;
pub mod upload;

pub use error::{DocumentError, StatementError};
pub use parsers::{LineOutcome, ParsedPages, parse_line, parse_pages};
pub use pdf::{extract_pages, extract_pages_checked, extract_pages_from_mem};
pub use statement_info::parse_statement_info;
pub use types::{ParseStats, ParsedLine, StatementInfo};
pub use upload::StagedUpload;
