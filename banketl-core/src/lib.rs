//! BankETL Core: domain types, page fetching, table extraction, currency conversion.
//!
//! This crate holds the extract and transform halves of the pipeline:
//! - Domain types (raw rows, bank records, currencies, exchange rates)
//! - `PageSource` trait with a blocking HTTP implementation
//! - First-table HTML extraction with positional column mapping
//! - Rate-file loading and rounded currency conversion

pub mod data;
pub mod domain;
pub mod transform;

pub use transform::{round_to, transform};
