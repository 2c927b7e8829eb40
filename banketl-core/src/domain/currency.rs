//! Target currencies and the exchange-rate map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Currencies the USD market cap is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    Gbp,
    Eur,
    Inr,
}

impl Currency {
    /// Every required currency, in output column order.
    pub const ALL: [Currency; 3] = [Currency::Gbp, Currency::Eur, Currency::Inr];

    /// ISO 4217 code as it appears in the rate file.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Inr => "INR",
        }
    }

    /// Name of the derived output column.
    pub fn column(self) -> &'static str {
        match self {
            Currency::Gbp => "MC_GBP_Billion",
            Currency::Eur => "MC_EUR_Billion",
            Currency::Inr => "MC_INR_Billion",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GBP" => Ok(Currency::Gbp),
            "EUR" => Ok(Currency::Eur),
            "INR" => Ok(Currency::Inr),
            other => Err(format!("unsupported currency code '{other}'")),
        }
    }
}

/// USD → currency multipliers for one run.
///
/// Only constructible with a rate for every entry of [`Currency::ALL`], so
/// lookups cannot fail. Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Currency, f64>",
    into = "BTreeMap<Currency, f64>"
)]
pub struct ExchangeRates {
    rates: BTreeMap<Currency, f64>,
}

impl ExchangeRates {
    /// Build from a partial map. Returns the first missing currency on failure.
    pub fn from_map(rates: BTreeMap<Currency, f64>) -> Result<Self, Currency> {
        match Currency::ALL.iter().find(|c| !rates.contains_key(*c)) {
            Some(missing) => Err(*missing),
            None => Ok(Self { rates }),
        }
    }

    pub fn new(gbp: f64, eur: f64, inr: f64) -> Self {
        let rates = BTreeMap::from([
            (Currency::Gbp, gbp),
            (Currency::Eur, eur),
            (Currency::Inr, inr),
        ]);
        Self { rates }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates[&currency]
    }
}

impl TryFrom<BTreeMap<Currency, f64>> for ExchangeRates {
    type Error = String;

    fn try_from(rates: BTreeMap<Currency, f64>) -> Result<Self, Self::Error> {
        Self::from_map(rates).map_err(|missing| format!("exchange rate for {missing} missing"))
    }
}

impl From<ExchangeRates> for BTreeMap<Currency, f64> {
    fn from(rates: ExchangeRates) -> Self {
        rates.rates
    }
}
