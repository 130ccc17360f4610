use invoice_core::normalize::{FieldNormalizer, PLACEHOLDER_CODE_MAX, PLACEHOLDER_CODE_MIN};
use invoice_core::{generate_invoice, InvoiceConfig, InvoiceError, InvoiceRequest, ItemFields};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Check whether a byte pattern exists in the buffer.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn plain_config() -> InvoiceConfig {
    let mut config = InvoiceConfig::default();
    config.page.compress = false;
    config
}

fn acme_request() -> InvoiceRequest {
    let mut items = ItemFields::default();
    items.push("Widget", "12345678", "3", "10.00");
    InvoiceRequest {
        buyer: Some("Acme Co".to_string()),
        date: Some("2024-01-01".to_string()),
        items,
    }
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

// -------------------------------------------------------
// Successful generation
// -------------------------------------------------------

#[test]
fn acme_invoice_prints_expected_figures() {
    let file = generate_invoice(&acme_request(), &plain_config(), &mut rng()).unwrap();
    let pdf = &file.bytes;

    assert_eq!(file.file_name, "invoice.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert!(pdf.starts_with(b"%PDF-1.7"));
    assert!(pdf.ends_with(b"%%EOF\n"));

    assert!(contains(pdf, b"(Widget) Tj"));
    assert!(contains(pdf, b"(12345678) Tj"));
    assert!(contains(pdf, b"(30.00) Tj"));
    assert!(contains(pdf, b"(Rs. 30.00) Tj"));
    assert!(contains(pdf, b"(Rs. 2.70) Tj"));
    assert!(contains(pdf, b"(Rs. 35.40) Tj"));
    assert!(contains(pdf, b"(SGST \\(9%\\) @ Gujarat) Tj"));
    assert!(contains(pdf, b"(CGST \\(9%\\) @ Central) Tj"));
    assert!(contains(pdf, b"( Acme Co) Tj"));
    assert!(contains(pdf, b"/Title (Invoice 001)"));
}

#[test]
fn seller_details_come_from_config() {
    let mut config = plain_config();
    config.seller.name = "Northwind Supplies".to_string();
    config.bank.ifsc = "TEST0000001".to_string();
    let file = generate_invoice(&acme_request(), &config, &mut rng()).unwrap();

    assert!(contains(&file.bytes, b"(Northwind Supplies) Tj"));
    assert!(contains(&file.bytes, b"(For Northwind Supplies) Tj"));
    assert!(contains(&file.bytes, b"TEST0000001"));
}

#[test]
fn zero_items_render_zero_totals() {
    let mut request = acme_request();
    request.items = ItemFields::default();
    let file = generate_invoice(&request, &plain_config(), &mut rng()).unwrap();

    assert!(contains(&file.bytes, b"(Rs. 0.00) Tj"));
    assert!(contains(&file.bytes, b"(Total \\(Excl. Tax\\)) Tj"));
}

#[test]
fn default_config_compresses_content() {
    let file = generate_invoice(&acme_request(), &InvoiceConfig::default(), &mut rng()).unwrap();
    assert!(contains(&file.bytes, b"/Filter /FlateDecode"));
    assert!(!contains(&file.bytes, b"(Widget) Tj"));
}

#[test]
fn same_seed_same_document() {
    let mut request = acme_request();
    request.items.push("Bolt", "", "10", "0.25");
    request.items.push("Nut", " ", "10", "0.10");

    let a = generate_invoice(&request, &plain_config(), &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
    let b = generate_invoice(&request, &plain_config(), &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn seeded_placeholders_are_reproducible_and_in_range() {
    let mut fields = ItemFields::default();
    fields.push("Bolt", "", "1", "1");
    fields.push("Nut", "", "1", "1");

    let first = FieldNormalizer::new(ChaCha8Rng::seed_from_u64(3))
        .normalize(&fields)
        .unwrap();
    let second = FieldNormalizer::new(ChaCha8Rng::seed_from_u64(3))
        .normalize(&fields)
        .unwrap();

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.code(), b.code());
        let code: u32 = a.code().parse().unwrap();
        assert!((PLACEHOLDER_CODE_MIN..=PLACEHOLDER_CODE_MAX).contains(&code));
        assert_eq!(a.code().len(), 8);
    }
}

// -------------------------------------------------------
// Rejected requests
// -------------------------------------------------------

#[test]
fn bad_quantity_is_rejected() {
    let mut request = acme_request();
    request.items.quantities[0] = "abc".to_string();
    let err = generate_invoice(&request, &plain_config(), &mut rng()).unwrap_err();

    assert!(matches!(err, InvoiceError::InvalidQuantity { line: 1, .. }));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn bad_rate_is_rejected() {
    let mut request = acme_request();
    request.items.rates[0] = "xyz".to_string();
    let err = generate_invoice(&request, &plain_config(), &mut rng()).unwrap_err();

    assert!(matches!(err, InvoiceError::InvalidRate { line: 1, .. }));
}

#[test]
fn mismatched_lists_are_rejected() {
    let mut request = acme_request();
    request.items.codes.push("99999999".to_string());
    let err = generate_invoice(&request, &plain_config(), &mut rng()).unwrap_err();

    match err {
        InvoiceError::ItemCountMismatch {
            descriptions,
            codes,
            quantities,
            rates,
        } => {
            assert_eq!((descriptions, codes, quantities, rates), (1, 2, 1, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_buyer_is_rejected() {
    let mut request = acme_request();
    request.buyer = None;
    let err = generate_invoice(&request, &plain_config(), &mut rng()).unwrap_err();
    assert!(matches!(err, InvoiceError::MissingField("buyer")));
}

// -------------------------------------------------------
// Requests from TOML
// -------------------------------------------------------

#[test]
fn request_deserializes_from_toml() {
    let request: InvoiceRequest = toml::from_str(
        r#"
buyer = "Acme Co"
date = "2024-01-01"

[items]
descriptions = ["Widget"]
codes = ["12345678"]
quantities = ["3"]
rates = ["10.00"]
"#,
    )
    .unwrap();
    assert_eq!(request, acme_request());
}

#[test]
fn request_without_items_has_empty_lists() {
    let request: InvoiceRequest = toml::from_str("buyer = \"Acme Co\"\n").unwrap();
    assert_eq!(request.items, ItemFields::default());
    assert_eq!(request.date, None);
}
