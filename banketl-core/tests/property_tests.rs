//! Property tests for conversion invariants.
//!
//! Uses proptest to verify:
//! 1. Every derived column equals round(usd * rate, 2)
//! 2. Rounding never moves a value by more than half a cent
//! 3. Row count and order survive the transform

use banketl_core::domain::{Currency, ExchangeRates, ExtractedTable, RawRow};
use banketl_core::{round_to, transform};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_usd() -> impl Strategy<Value = f64> {
    (0.0..5000.0_f64).prop_map(|v| (v * 100.0).round() / 100.0)
}

fn arb_rate() -> impl Strategy<Value = f64> {
    0.01..200.0_f64
}

fn arb_rates() -> impl Strategy<Value = ExchangeRates> {
    (arb_rate(), arb_rate(), arb_rate()).prop_map(|(g, e, i)| ExchangeRates::new(g, e, i))
}

fn arb_rows() -> impl Strategy<Value = Vec<RawRow>> {
    prop::collection::vec(
        ("[A-Z][a-z]{2,10}( Bank)?", arb_usd()).prop_map(|(name, usd)| RawRow::new(name, usd.to_string())),
        0..30,
    )
}

// ── 1. Derived columns ───────────────────────────────────────────────

proptest! {
    #[test]
    fn derived_columns_match_rounded_product(rows in arb_rows(), rates in arb_rates()) {
        let extracted = ExtractedTable::new(rows);
        let out = transform(&extracted, &rates).unwrap();

        for rec in &out.records {
            prop_assert_eq!(rec.mc_gbp_billion, round_to(rec.mc_usd_billion * rates.rate(Currency::Gbp), 2));
            prop_assert_eq!(rec.mc_eur_billion, round_to(rec.mc_usd_billion * rates.rate(Currency::Eur), 2));
            prop_assert_eq!(rec.mc_inr_billion, round_to(rec.mc_usd_billion * rates.rate(Currency::Inr), 2));
        }
    }
}

// ── 2. Rounding bound ────────────────────────────────────────────────

proptest! {
    #[test]
    fn rounding_moves_at_most_half_a_cent(usd in arb_usd(), rate in arb_rate()) {
        let exact = usd * rate;
        let rounded = round_to(exact, 2);
        prop_assert!((rounded - exact).abs() <= 0.005 + exact.abs() * 1e-12);
    }
}

// ── 3. Shape ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn transform_preserves_row_count_and_order(rows in arb_rows(), rates in arb_rates()) {
        let names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
        let out = transform(&ExtractedTable::new(rows), &rates).unwrap();
        let out_names: Vec<String> = out.records.iter().map(|r| r.name.clone()).collect();
        prop_assert_eq!(names, out_names);
    }
}
