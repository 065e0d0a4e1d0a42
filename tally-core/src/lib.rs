//! tally-core: transaction model and date utilities shared by the statement pipeline

pub mod finance;
pub mod time;

pub use finance::{Category, SignConvention, Transaction, TxnType, round_money};
pub use time::{WeekNumbering, parse_statement_date};
