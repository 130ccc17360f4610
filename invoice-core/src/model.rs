use rust_decimal::Decimal;

use crate::error::{InvoiceError, InvoiceResult};

/// One billed line. Fields are fixed at construction; `amount` is derived
/// once from `quantity` and `rate` and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    description: String,
    code: String,
    quantity: u32,
    rate: Decimal,
    amount: Decimal,
}

impl LineItem {
    /// Build a line and compute its amount at full precision.
    ///
    /// `line` is the 1-based input position, used only for the overflow
    /// error.
    pub fn new(
        line: usize,
        description: impl Into<String>,
        code: impl Into<String>,
        quantity: u32,
        rate: Decimal,
    ) -> InvoiceResult<Self> {
        let amount = Decimal::from(quantity)
            .checked_mul(rate)
            .ok_or(InvoiceError::AmountOverflow { line: Some(line) })?;
        Ok(LineItem {
            description: description.into(),
            code: code.into(),
            quantity,
            rate,
            amount,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// HSN code, either as supplied or a generated placeholder.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// `quantity * rate`, unrounded.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// A named percentage levied on the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate {
    /// Short tax name, e.g. "SGST".
    pub name: &'static str,
    /// Where the tax is levied, e.g. "Gujarat".
    pub jurisdiction: &'static str,
    /// Fraction of the subtotal, e.g. 0.09.
    pub rate: Decimal,
}

impl TaxRate {
    /// State goods and services tax, 9%.
    pub const SGST: TaxRate = TaxRate {
        name: "SGST",
        jurisdiction: "Gujarat",
        rate: Decimal::from_parts(9, 0, 0, false, 2),
    };

    /// Central goods and services tax, 9%.
    pub const CGST: TaxRate = TaxRate {
        name: "CGST",
        jurisdiction: "Central",
        rate: Decimal::from_parts(9, 0, 0, false, 2),
    };

    /// Rate as a whole percentage for labels (0.09 -> 9).
    pub fn percent(&self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }
}

/// One computed tax line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComponent {
    pub rate: TaxRate,
    /// `subtotal * rate.rate`, unrounded.
    pub amount: Decimal,
}

/// Ordered tax lines, all levied on the same subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxBreakdown {
    components: Vec<TaxComponent>,
}

impl TaxBreakdown {
    /// Apply every rate to `base` independently.
    pub fn levy(base: Decimal, rates: &[TaxRate]) -> InvoiceResult<Self> {
        let components = rates
            .iter()
            .map(|rate| {
                base.checked_mul(rate.rate)
                    .map(|amount| TaxComponent { rate: *rate, amount })
                    .ok_or(InvoiceError::AmountOverflow { line: None })
            })
            .collect::<InvoiceResult<Vec<_>>>()?;
        Ok(TaxBreakdown { components })
    }

    pub fn components(&self) -> &[TaxComponent] {
        &self.components
    }

    /// Sum of all component amounts, unrounded.
    pub fn total(&self) -> InvoiceResult<Decimal> {
        checked_sum(self.components.iter().map(|c| c.amount))
    }
}

/// A fully computed invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub(crate) buyer: String,
    pub(crate) date: String,
    pub(crate) items: Vec<LineItem>,
    pub(crate) subtotal: Decimal,
    pub(crate) taxes: TaxBreakdown,
    pub(crate) grand_total: Decimal,
}

impl Invoice {
    pub fn buyer(&self) -> &str {
        &self.buyer
    }

    /// Invoice date exactly as supplied.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Lines in input order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Exact sum of line amounts.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn taxes(&self) -> &TaxBreakdown {
        &self.taxes
    }

    /// Subtotal plus every tax component, unrounded.
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }
}

/// Sum decimals, reporting overflow instead of panicking.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> InvoiceResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or(InvoiceError::AmountOverflow { line: None })
    })
}
