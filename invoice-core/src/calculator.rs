use crate::error::{InvoiceError, InvoiceResult};
use crate::model::{checked_sum, Invoice, LineItem, TaxBreakdown, TaxRate};

/// The tax regime applied to every invoice: SGST and CGST at 9% each.
pub const GST_RATES: [TaxRate; 2] = [TaxRate::SGST, TaxRate::CGST];

/// Derives subtotal, taxes and grand total from validated lines.
///
/// All arithmetic is exact; nothing here rounds.
#[derive(Debug, Clone)]
pub struct InvoiceCalculator {
    rates: Vec<TaxRate>,
}

impl Default for InvoiceCalculator {
    fn default() -> Self {
        InvoiceCalculator {
            rates: GST_RATES.to_vec(),
        }
    }
}

impl InvoiceCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rates(&self) -> &[TaxRate] {
        &self.rates
    }

    /// Build the invoice. `buyer` and `date` must be non-blank.
    pub fn calculate(
        &self,
        buyer: &str,
        date: &str,
        items: Vec<LineItem>,
    ) -> InvoiceResult<Invoice> {
        let buyer = required("buyer", buyer)?;
        let date = required("date", date)?;

        let subtotal = checked_sum(items.iter().map(LineItem::amount))?;
        let taxes = TaxBreakdown::levy(subtotal, &self.rates)?;
        let grand_total = subtotal
            .checked_add(taxes.total()?)
            .ok_or(InvoiceError::AmountOverflow { line: None })?;

        Ok(Invoice {
            buyer,
            date,
            items,
            subtotal,
            taxes,
            grand_total,
        })
    }
}

fn required(name: &'static str, value: &str) -> InvoiceResult<String> {
    if value.trim().is_empty() {
        return Err(InvoiceError::MissingField(name));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(qty: u32, rate: &str) -> LineItem {
        LineItem::new(1, "Item", "12345678", qty, dec(rate)).unwrap()
    }

    #[test]
    fn single_widget_invoice() {
        let invoice = InvoiceCalculator::new()
            .calculate("Acme Co", "2024-01-01", vec![item(3, "10.00")])
            .unwrap();
        assert_eq!(invoice.subtotal(), dec("30.00"));
        let taxes: Vec<Decimal> = invoice
            .taxes()
            .components()
            .iter()
            .map(|c| c.amount)
            .collect();
        assert_eq!(taxes, vec![dec("2.70"), dec("2.70")]);
        assert_eq!(invoice.grand_total(), dec("35.40"));
        assert_eq!(invoice.buyer(), "Acme Co");
        assert_eq!(invoice.date(), "2024-01-01");
    }

    #[test]
    fn no_items_gives_zero_totals() {
        let invoice = InvoiceCalculator::new()
            .calculate("Acme Co", "2024-01-01", Vec::new())
            .unwrap();
        assert!(invoice.subtotal().is_zero());
        assert!(invoice.grand_total().is_zero());
        assert_eq!(invoice.taxes().components().len(), 2);
        assert!(invoice.taxes().components().iter().all(|c| c.amount.is_zero()));
    }

    #[test]
    fn subtotal_is_not_rounded() {
        let invoice = InvoiceCalculator::new()
            .calculate(
                "Acme Co",
                "2024-01-01",
                vec![item(1, "0.333"), item(1, "0.333"), item(1, "0.333")],
            )
            .unwrap();
        assert_eq!(invoice.subtotal(), dec("0.999"));
        assert_eq!(invoice.grand_total(), dec("0.999") + dec("0.999") * dec("0.18"));
    }

    #[test]
    fn items_keep_input_order() {
        let invoice = InvoiceCalculator::new()
            .calculate(
                "Acme Co",
                "2024-01-01",
                vec![
                    LineItem::new(1, "First", "1", 1, dec("1")).unwrap(),
                    LineItem::new(2, "Second", "2", 1, dec("1")).unwrap(),
                ],
            )
            .unwrap();
        let names: Vec<&str> = invoice.items().iter().map(|i| i.description()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn blank_buyer_is_missing() {
        let err = InvoiceCalculator::new()
            .calculate("  ", "2024-01-01", Vec::new())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::MissingField("buyer")));
    }

    #[test]
    fn blank_date_is_missing() {
        let err = InvoiceCalculator::new()
            .calculate("Acme Co", "", Vec::new())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::MissingField("date")));
    }

    #[test]
    fn totals_overflow_is_reported() {
        let big = LineItem::new(1, "Big", "1", 1, Decimal::MAX).unwrap();
        let err = InvoiceCalculator::new()
            .calculate("Acme Co", "2024-01-01", vec![big.clone(), big])
            .unwrap_err();
        assert!(matches!(err, InvoiceError::AmountOverflow { line: None }));
    }
}
