//! Presentation rounding.
//!
//! Amounts are carried unrounded through the calculator; this is the only
//! place they are cut to two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{Invoice, TaxRate};

/// Round half away from zero to cents.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-decimal string for a table cell, e.g. `30` -> `"30.00"`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_cents(amount);
    rounded.rescale(2);
    rounded.to_string()
}

/// The figures printed in the tax summary.
///
/// Each figure is rounded once, and the grand total is the sum of the
/// rounded figures, so the printed column always adds up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTotals {
    pub subtotal: Decimal,
    pub taxes: Vec<(TaxRate, Decimal)>,
    pub grand_total: Decimal,
}

impl DisplayTotals {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let subtotal = round_cents(invoice.subtotal());
        let taxes: Vec<(TaxRate, Decimal)> = invoice
            .taxes()
            .components()
            .iter()
            .map(|c| (c.rate, round_cents(c.amount)))
            .collect();
        let grand_total = taxes
            .iter()
            .fold(subtotal, |acc, (_, amount)| acc + *amount);
        DisplayTotals {
            subtotal,
            taxes,
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_two_places() {
        assert_eq!(format_amount(dec("30")), "30.00");
        assert_eq!(format_amount(dec("2.7")), "2.70");
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("1234.5678")), "1234.57");
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(dec("0.125")), "0.13");
        assert_eq!(format_amount(dec("0.135")), "0.14");
        assert_eq!(round_cents(dec("0.005")), dec("0.01"));
    }

    #[test]
    fn rounding_happens_once() {
        // 0.0049 must not become 0.005 and then 0.01
        assert_eq!(format_amount(dec("0.0049")), "0.00");
    }
}
