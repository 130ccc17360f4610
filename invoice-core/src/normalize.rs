use std::str::FromStr;

use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{InvoiceError, InvoiceResult};
use crate::model::LineItem;

/// Smallest generated placeholder code.
pub const PLACEHOLDER_CODE_MIN: u32 = 10_000_000;
/// Largest generated placeholder code.
pub const PLACEHOLDER_CODE_MAX: u32 = 99_999_999;

/// Raw per-item form fields: four parallel lists, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ItemFields {
    pub descriptions: Vec<String>,
    pub codes: Vec<String>,
    pub quantities: Vec<String>,
    pub rates: Vec<String>,
}

impl ItemFields {
    /// Append one line's raw fields.
    pub fn push(
        &mut self,
        description: impl Into<String>,
        code: impl Into<String>,
        quantity: impl Into<String>,
        rate: impl Into<String>,
    ) -> &mut Self {
        self.descriptions.push(description.into());
        self.codes.push(code.into());
        self.quantities.push(quantity.into());
        self.rates.push(rate.into());
        self
    }

    /// Number of lines, or `ItemCountMismatch` if the lists disagree.
    pub fn line_count(&self) -> InvoiceResult<usize> {
        let n = self.descriptions.len();
        if self.codes.len() != n || self.quantities.len() != n || self.rates.len() != n {
            return Err(InvoiceError::ItemCountMismatch {
                descriptions: n,
                codes: self.codes.len(),
                quantities: self.quantities.len(),
                rates: self.rates.len(),
            });
        }
        Ok(n)
    }
}

/// Turns raw item fields into validated [`LineItem`]s.
///
/// Blank codes are filled from the supplied random source, so callers
/// decide between an OS-seeded generator and a fixed seed.
pub struct FieldNormalizer<R> {
    rng: R,
}

impl<R: Rng> FieldNormalizer<R> {
    pub fn new(rng: R) -> Self {
        FieldNormalizer { rng }
    }

    /// Validate and convert every line.
    ///
    /// Quantities are checked first, then rates; placeholder codes are only
    /// drawn once the whole input is known to be valid.
    pub fn normalize(&mut self, fields: &ItemFields) -> InvoiceResult<Vec<LineItem>> {
        fields.line_count()?;

        let quantities = fields
            .quantities
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_quantity(i + 1, raw))
            .collect::<InvoiceResult<Vec<_>>>()?;
        let rates = fields
            .rates
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_rate(i + 1, raw))
            .collect::<InvoiceResult<Vec<_>>>()?;

        let mut items = Vec::with_capacity(quantities.len());
        for (i, (quantity, rate)) in quantities.into_iter().zip(rates).enumerate() {
            let code = self.resolve_code(&fields.codes[i]);
            items.push(LineItem::new(
                i + 1,
                fields.descriptions[i].as_str(),
                code,
                quantity,
                rate,
            )?);
        }
        Ok(items)
    }

    fn resolve_code(&mut self, raw: &str) -> String {
        if raw.trim().is_empty() {
            let code = placeholder_code(&mut self.rng);
            debug!(code = %code, "generated placeholder code");
            code
        } else {
            raw.to_string()
        }
    }

    /// Give back the random source.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

/// Draw an 8-digit stand-in code.
pub fn placeholder_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(PLACEHOLDER_CODE_MIN..=PLACEHOLDER_CODE_MAX)
        .to_string()
}

fn parse_quantity(line: usize, raw: &str) -> InvoiceResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| InvoiceError::InvalidQuantity {
            line,
            value: raw.to_string(),
        })
}

fn parse_rate(line: usize, raw: &str) -> InvoiceResult<Decimal> {
    let invalid = || InvoiceError::InvalidRate {
        line,
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let rate = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(invalid());
    }
    Ok(rate)
}
