//! Currency conversion of the extracted table.

use crate::data::DataError;
use crate::domain::{BankRecord, Currency, ExchangeRates, ExtractedTable, TransformedTable};
use tracing::debug;

/// Round to `decimals` places, halves away from zero.
///
/// Scales, applies `f64::round`, and scales back, so `93.465` (exactly
/// `9346.5` once scaled) becomes `93.47`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Convert `usd` into `currency`, rounded to cents.
pub fn convert(usd: f64, rates: &ExchangeRates, currency: Currency) -> f64 {
    round_to(usd * rates.rate(currency), 2)
}

/// Parse MC_USD_Billion and derive the GBP, EUR and INR columns.
pub fn transform(
    extracted: &ExtractedTable,
    rates: &ExchangeRates,
) -> Result<TransformedTable, DataError> {
    let records = extracted
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let usd = row
                .market_cap_usd
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidNumber {
                    row: i + 1,
                    column: "MC_USD_Billion",
                    value: row.market_cap_usd.clone(),
                })?;

            Ok(BankRecord {
                name: row.name.clone(),
                mc_usd_billion: usd,
                mc_gbp_billion: convert(usd, rates, Currency::Gbp),
                mc_eur_billion: convert(usd, rates, Currency::Eur),
                mc_inr_billion: convert(usd, rates, Currency::Inr),
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    debug!(rows = records.len(), "transformed table");
    Ok(TransformedTable::new(records))
}
