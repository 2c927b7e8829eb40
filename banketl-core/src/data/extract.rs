//! HTML table extraction.
//!
//! Reads the first `<table>` in the document. Cells are picked by position,
//! which ties the extractor to the layout of the source page; the positions
//! live in [`ColumnMapping`] so a layout change is a config edit.

use super::source::DataError;
use crate::domain::{ExtractedTable, RawRow};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Zero-based `<td>` positions of the extracted columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name_cell: usize,
    pub market_cap_cell: usize,
}

impl ColumnMapping {
    /// Number of data cells a row must have for both positions to exist.
    pub fn required_cells(&self) -> usize {
        self.name_cell.max(self.market_cap_cell) + 1
    }
}

impl Default for ColumnMapping {
    /// Rank, bank name, market cap: name is the 2nd cell, market cap the 3rd.
    fn default() -> Self {
        Self {
            name_cell: 1,
            market_cap_cell: 2,
        }
    }
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector must parse")
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Extract (Name, MC_USD_Billion) from the first table of `html`.
///
/// Rows with no `<td>` (header rows) are skipped. A data row too short for
/// `mapping` is an error, not a silent skip.
pub fn extract_table(html: &str, mapping: &ColumnMapping) -> Result<ExtractedTable, DataError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table");
    let row_sel = selector("tr");
    let cell_sel = selector("td");

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(DataError::TableNotFound)?;

    let required = mapping.required_cells();
    let mut rows = Vec::new();

    for (i, tr) in table.select(&row_sel).enumerate() {
        let cells: Vec<ElementRef<'_>> = tr.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < required {
            return Err(DataError::MalformedRow {
                row: i + 1,
                cells: cells.len(),
                required,
            });
        }
        rows.push(RawRow::new(
            cell_text(&cells[mapping.name_cell]),
            cell_text(&cells[mapping.market_cap_cell]),
        ));
    }

    debug!(rows = rows.len(), "extracted table rows");
    Ok(ExtractedTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <p>By market capitalization</p>
        <table class="wikitable">
          <tbody>
            <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
            <tr><td>1</td><td><a href="/wiki/JPMorgan_Chase">JPMorgan Chase</a>
            </td><td>432.92
            </td></tr>
            <tr><td>2</td><td><span class="flag"></span> <a href="/wiki/BoA">Bank of America</a></td><td>231.52</td></tr>
          </tbody>
        </table>
        <table><tr><td>x</td><td>Ignored Bank</td><td>1.0</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn extracts_rows_from_first_table_in_order() {
        let table = extract_table(PAGE, &ColumnMapping::default()).unwrap();
        assert_eq!(
            table.rows,
            vec![
                RawRow::new("JPMorgan Chase", "432.92"),
                RawRow::new("Bank of America", "231.52"),
            ]
        );
    }

    #[test]
    fn header_only_table_yields_no_rows() {
        let html = "<table><tr><th>Rank</th><th>Bank</th><th>Cap</th></tr></table>";
        let table = extract_table(html, &ColumnMapping::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = extract_table("<html><body><p>moved</p></body></html>", &ColumnMapping::default())
            .unwrap_err();
        assert!(matches!(err, DataError::TableNotFound));
    }

    #[test]
    fn short_data_row_is_an_error() {
        let html = "<table>\
            <tr><th>a</th><th>b</th><th>c</th></tr>\
            <tr><td>1</td><td>Only name</td></tr>\
            </table>";
        let err = extract_table(html, &ColumnMapping::default()).unwrap_err();
        match err {
            DataError::MalformedRow {
                row,
                cells,
                required,
            } => {
                assert_eq!(row, 2);
                assert_eq!(cells, 2);
                assert_eq!(required, 3);
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn custom_mapping_reads_other_cells() {
        let html = "<table><tr><td>Bank Z</td><td>12.5</td></tr></table>";
        let mapping = ColumnMapping {
            name_cell: 0,
            market_cap_cell: 1,
        };
        let table = extract_table(html, &mapping).unwrap();
        assert_eq!(table.rows, vec![RawRow::new("Bank Z", "12.5")]);
    }
}
