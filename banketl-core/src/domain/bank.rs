//! Bank market-cap tables before and after currency conversion.

use serde::{Deserialize, Serialize};

/// A single scraped row, exactly as the page rendered it (trimmed text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    pub market_cap_usd: String,
}

impl RawRow {
    pub fn new(name: impl Into<String>, market_cap_usd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            market_cap_usd: market_cap_usd.into(),
        }
    }
}

/// Rows pulled from the source table, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub rows: Vec<RawRow>,
}

impl ExtractedTable {
    /// Column names this table carries.
    pub const COLUMNS: [&'static str; 2] = ["Name", "MC_USD_Billion"];

    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Storage class of a column, used to build SQL schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Real,
}

/// Name and kind of one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// One bank with its market cap in every supported currency (billions).
///
/// Invariant: each converted figure equals `round_to(mc_usd_billion * rate, 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub mc_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: f64,
}

/// The canonical output of the transform step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedTable {
    pub records: Vec<BankRecord>,
}

impl TransformedTable {
    /// Output schema, in column order. Present even when there are no records.
    pub const COLUMNS: [ColumnSpec; 5] = [
        ColumnSpec { name: "Name", kind: ColumnKind::Text },
        ColumnSpec { name: "MC_USD_Billion", kind: ColumnKind::Real },
        ColumnSpec { name: "MC_GBP_Billion", kind: ColumnKind::Real },
        ColumnSpec { name: "MC_EUR_Billion", kind: ColumnKind::Real },
        ColumnSpec { name: "MC_INR_Billion", kind: ColumnKind::Real },
    ];

    pub fn new(records: Vec<BankRecord>) -> Self {
        Self { records }
    }

    pub fn column_names() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
