use invoice_core::normalize::{PLACEHOLDER_CODE_MAX, PLACEHOLDER_CODE_MIN};
use invoice_core::{
    DisplayTotals, FieldNormalizer, InvoiceCalculator, InvoiceError, ItemFields, LineItem,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

/// (quantity, rate mantissa, rate scale)
fn line() -> impl Strategy<Value = (u32, i64, u32)> {
    (0u32..10_000, 0i64..100_000_000, 0u32..5)
}

fn fields(lines: &[(u32, i64, u32)], code: &str) -> ItemFields {
    let mut fields = ItemFields::default();
    for (i, &(qty, mantissa, scale)) in lines.iter().enumerate() {
        fields.push(
            format!("Item {i}"),
            code,
            qty.to_string(),
            Decimal::new(mantissa, scale).to_string(),
        );
    }
    fields
}

fn items(lines: &[(u32, i64, u32)]) -> Vec<LineItem> {
    FieldNormalizer::new(ChaCha8Rng::seed_from_u64(0))
        .normalize(&fields(lines, "12345678"))
        .unwrap()
}

proptest! {
    #[test]
    fn subtotal_is_sum_of_amounts(lines in prop::collection::vec(line(), 0..20)) {
        let items = items(&lines);
        let expected: Decimal = items.iter().map(LineItem::amount).sum();
        let invoice = InvoiceCalculator::new().calculate("Acme Co", "today", items).unwrap();
        prop_assert_eq!(invoice.subtotal(), expected);
    }

    #[test]
    fn amounts_are_quantity_times_rate(lines in prop::collection::vec(line(), 1..10)) {
        for (item, &(qty, mantissa, scale)) in items(&lines).iter().zip(&lines) {
            prop_assert_eq!(item.amount(), Decimal::from(qty) * Decimal::new(mantissa, scale));
        }
    }

    #[test]
    fn grand_total_is_subtotal_plus_taxes(lines in prop::collection::vec(line(), 0..20)) {
        let invoice = InvoiceCalculator::new()
            .calculate("Acme Co", "today", items(&lines))
            .unwrap();
        let taxes: Decimal = invoice.taxes().components().iter().map(|c| c.amount).sum();
        prop_assert_eq!(invoice.grand_total(), invoice.subtotal() + taxes);
        for component in invoice.taxes().components() {
            prop_assert_eq!(component.amount, invoice.subtotal() * component.rate.rate);
        }
    }

    #[test]
    fn displayed_totals_add_up(lines in prop::collection::vec(line(), 0..20)) {
        let invoice = InvoiceCalculator::new()
            .calculate("Acme Co", "today", items(&lines))
            .unwrap();
        let display = DisplayTotals::from_invoice(&invoice);
        let taxes: Decimal = display.taxes.iter().map(|(_, amount)| *amount).sum();
        prop_assert_eq!(display.grand_total, display.subtotal + taxes);
        prop_assert!((display.grand_total - invoice.grand_total()).abs() <= Decimal::new(15, 3));
    }

    #[test]
    fn supplied_codes_are_kept(code in "[0-9]{8}", lines in prop::collection::vec(line(), 1..5)) {
        let items = FieldNormalizer::new(ChaCha8Rng::seed_from_u64(1))
            .normalize(&fields(&lines, &code))
            .unwrap();
        prop_assert!(items.iter().all(|item| item.code() == code));
    }

    #[test]
    fn blank_codes_get_placeholders(seed in any::<u64>(), lines in prop::collection::vec(line(), 1..5)) {
        let items = FieldNormalizer::new(ChaCha8Rng::seed_from_u64(seed))
            .normalize(&fields(&lines, ""))
            .unwrap();
        for item in &items {
            let code: u32 = item.code().parse().unwrap();
            prop_assert!((PLACEHOLDER_CODE_MIN..=PLACEHOLDER_CODE_MAX).contains(&code));
        }
    }

    #[test]
    fn length_mismatch_always_fails(
        descriptions in 0usize..5,
        codes in 0usize..5,
        quantities in 0usize..5,
        rates in 0usize..5,
    ) {
        prop_assume!(!(descriptions == codes && codes == quantities && quantities == rates));
        let fields = ItemFields {
            descriptions: vec!["x".into(); descriptions],
            codes: vec!["".into(); codes],
            quantities: vec!["1".into(); quantities],
            rates: vec!["1".into(); rates],
        };
        let result = FieldNormalizer::new(ChaCha8Rng::seed_from_u64(0)).normalize(&fields);
        let is_mismatch = matches!(result, Err(InvoiceError::ItemCountMismatch { .. }));
        prop_assert!(is_mismatch);
    }
}
