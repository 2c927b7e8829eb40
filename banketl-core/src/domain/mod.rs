//! Domain types: extracted rows, currencies, and the transformed bank table.

pub mod bank;
pub mod currency;

pub use bank::{BankRecord, ColumnKind, ColumnSpec, ExtractedTable, RawRow, TransformedTable};
pub use currency::{Currency, ExchangeRates};
