//! CSV export of the transformed table.
//!
//! Columns: Name, MC_USD_Billion, MC_GBP_Billion, MC_EUR_Billion,
//! MC_INR_Billion. The header is written even when there are no records.
//! Numbers use the shortest representation that parses back to the same
//! `f64`, so a read after a write returns identical values.

use std::fs;
use std::path::Path;

use banketl_core::domain::{BankRecord, TransformedTable};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV output is not valid UTF-8")]
    Encoding,
}

/// Render the table as CSV text.
pub fn export_csv(table: &TransformedTable) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(TransformedTable::column_names())?;

    for r in &table.records {
        wtr.write_record([
            &r.name,
            &r.mc_usd_billion.to_string(),
            &r.mc_gbp_billion.to_string(),
            &r.mc_eur_billion.to_string(),
            &r.mc_inr_billion.to_string(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(data).map_err(|_| ExportError::Encoding)
}

/// Write the table to `path`, replacing any existing file.
pub fn write_csv(table: &TransformedTable, path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let text = export_csv(table)?;
    fs::write(path, text).map_err(io_err)?;
    debug!(path = %path.display(), rows = table.len(), "wrote CSV");
    Ok(())
}

/// Parse CSV text produced by [`export_csv`].
pub fn import_csv(text: &str) -> Result<TransformedTable, ExportError> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let records = rdr
        .deserialize::<BankRecord>()
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(TransformedTable::new(records))
}

/// Read a CSV file written by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<TransformedTable, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_csv(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransformedTable {
        TransformedTable::new(vec![
            BankRecord {
                name: "JPMorgan Chase".into(),
                mc_usd_billion: 432.92,
                mc_gbp_billion: 346.34,
                mc_eur_billion: 402.62,
                mc_inr_billion: 35910.71,
            },
            BankRecord {
                name: "Industrial and Commercial Bank of China".into(),
                mc_usd_billion: 194.56,
                mc_gbp_billion: 155.65,
                mc_eur_billion: 180.94,
                mc_inr_billion: 16138.75,
            },
        ])
    }

    #[test]
    fn header_and_rows() {
        let csv = export_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion"
        );
        assert_eq!(lines[1], "JPMorgan Chase,432.92,346.34,402.62,35910.71");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_still_has_header() {
        let csv = export_csv(&TransformedTable::default()).unwrap();
        assert_eq!(
            csv,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion\n"
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let table = TransformedTable::new(vec![BankRecord {
            name: "Bank, Ltd.".into(),
            mc_usd_billion: 1.0,
            mc_gbp_billion: 0.8,
            mc_eur_billion: 0.93,
            mc_inr_billion: 82.5,
        }]);
        let csv = export_csv(&table).unwrap();
        assert!(csv.contains("\"Bank, Ltd.\",1,0.8,0.93,82.5"));
        assert_eq!(import_csv(&csv).unwrap(), table);
    }

    #[test]
    fn file_round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/Largest_banks_data.csv");

        write_csv(&sample(), &path).unwrap();
        assert_eq!(read_csv(&path).unwrap(), sample());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        fs::write(&path, "stale contents that are longer than the new file\n".repeat(50)).unwrap();

        write_csv(&TransformedTable::default(), &path).unwrap();
        assert_eq!(read_csv(&path).unwrap(), TransformedTable::default());
    }
}
