//! Exchange-rate file loading.
//!
//! Format: CSV with a `Currency,Rate` header and one row per currency code.
//! Codes other than the required ones are ignored; when a code repeats, the
//! last row wins.

use super::source::DataError;
use crate::domain::{Currency, ExchangeRates};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: String,
}

impl ExchangeRates {
    /// Load rates from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load rates from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut rates = BTreeMap::new();

        for record in rdr.deserialize::<RateRow>() {
            let row = record.map_err(|e| DataError::RateFile(e.to_string()))?;

            let currency = match row.currency.parse::<Currency>() {
                Ok(c) => c,
                Err(_) => {
                    debug!(code = %row.currency, "ignoring unused currency");
                    continue;
                }
            };

            let rate = row
                .rate
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite() && *r > 0.0)
                .ok_or_else(|| DataError::InvalidRate {
                    currency: currency.code().to_string(),
                    value: row.rate.clone(),
                })?;

            if rates.insert(currency, rate).is_some() {
                warn!(%currency, rate, "duplicate rate, keeping the later row");
            }
        }

        ExchangeRates::from_map(rates).map_err(|missing| DataError::MissingRate {
            currency: missing.code().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ExchangeRates, DataError> {
        ExchangeRates::from_reader(text.as_bytes())
    }

    #[test]
    fn reads_required_rates() {
        let rates = parse("Currency,Rate\nEUR,0.93\nGBP,0.8\nINR,82.95\n").unwrap();
        assert_eq!(rates.rate(Currency::Gbp), 0.8);
        assert_eq!(rates.rate(Currency::Eur), 0.93);
        assert_eq!(rates.rate(Currency::Inr), 82.95);
    }

    #[test]
    fn missing_inr_is_an_error() {
        let err = parse("Currency,Rate\nGBP,0.8\nEUR,0.93\n").unwrap_err();
        match err {
            DataError::MissingRate { currency } => assert_eq!(currency, "INR"),
            other => panic!("expected MissingRate, got {other:?}"),
        }
    }

    #[test]
    fn unknown_codes_are_ignored() {
        let rates = parse("Currency,Rate\nJPY,147.2\nGBP,0.8\nEUR,0.93\nINR,82.5\n").unwrap();
        assert_eq!(rates.rate(Currency::Inr), 82.5);
    }

    #[test]
    fn later_duplicate_wins() {
        let rates = parse("Currency,Rate\nGBP,0.7\nEUR,0.93\nINR,82.5\nGBP,0.8\n").unwrap();
        assert_eq!(rates.rate(Currency::Gbp), 0.8);
    }

    #[test]
    fn non_numeric_rate_is_rejected() {
        let err = parse("Currency,Rate\nGBP,abc\nEUR,0.93\nINR,82.5\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidRate { .. }));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err = parse("Currency,Rate\nGBP,-0.8\nEUR,0.93\nINR,82.5\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidRate { .. }));
    }

    #[test]
    fn missing_header_column_is_a_rate_file_error() {
        let err = parse("Code,Value\nGBP,0.8\n").unwrap_err();
        assert!(matches!(err, DataError::RateFile(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ExchangeRates::from_path(Path::new("/nonexistent/exchange_rate.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
