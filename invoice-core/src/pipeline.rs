use rand::Rng;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::calculator::InvoiceCalculator;
use crate::composer::DocumentComposer;
use crate::config::InvoiceConfig;
use crate::error::{InvoiceError, InvoiceResult};
use crate::normalize::{FieldNormalizer, ItemFields};
use crate::pdf::PdfRenderer;
use crate::render::DocumentRenderer;

/// One invoice request as submitted: buyer, date and the raw item lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvoiceRequest {
    pub buyer: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub items: ItemFields,
}

/// A finished document ready to hand to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Validate, calculate, compose and render an invoice as PDF.
pub fn generate_invoice<R: Rng + ?Sized>(
    request: &InvoiceRequest,
    config: &InvoiceConfig,
    rng: &mut R,
) -> InvoiceResult<InvoiceFile> {
    generate_with(request, config, rng, &PdfRenderer::new(config.page.clone()))
}

/// Same as [`generate_invoice`] with a caller-supplied renderer.
#[instrument(skip_all, fields(lines = request.items.descriptions.len()))]
pub fn generate_with<R, D>(
    request: &InvoiceRequest,
    config: &InvoiceConfig,
    rng: &mut R,
    renderer: &D,
) -> InvoiceResult<InvoiceFile>
where
    R: Rng + ?Sized,
    D: DocumentRenderer + ?Sized,
{
    match build(request, config, rng, renderer) {
        Ok(file) => {
            info!(bytes = file.bytes.len(), "invoice generated");
            Ok(file)
        }
        Err(err) => {
            warn!(error = %err, status = err.status_code(), "invoice rejected");
            Err(err)
        }
    }
}

fn build<R, D>(
    request: &InvoiceRequest,
    config: &InvoiceConfig,
    rng: &mut R,
    renderer: &D,
) -> InvoiceResult<InvoiceFile>
where
    R: Rng + ?Sized,
    D: DocumentRenderer + ?Sized,
{
    let buyer = present("buyer", request.buyer.as_deref())?;
    let date = present("date", request.date.as_deref())?;

    let items = FieldNormalizer::new(rng).normalize(&request.items)?;
    let invoice = InvoiceCalculator::new().calculate(buyer, date, items)?;
    let blocks = DocumentComposer::new(config).compose(&invoice);

    let title = format!("Invoice {}", config.invoice_number);
    let bytes = renderer.render(&blocks, &title)?;

    Ok(InvoiceFile {
        bytes,
        file_name: config.file_name.clone(),
        content_type: renderer.content_type(),
    })
}

fn present<'a>(name: &'static str, value: Option<&'a str>) -> InvoiceResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(InvoiceError::MissingField(name))
}
