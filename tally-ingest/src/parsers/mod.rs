pub mod enbd;

pub use enbd::{LineOutcome, ParsedPages, parse_line, parse_pages, transactions};
