use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the invoice pipeline.
pub type InvoiceResult<T> = Result<T, InvoiceError>;

/// Failure raised while turning a request into a document.
///
/// Every variant except `Render` describes bad input and maps to a client
/// error; nothing is composed or rendered once one of them is raised.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// A required text field (buyer or date) was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The four per-item lists do not have the same length.
    #[error(
        "item lists differ in length: {descriptions} descriptions, {codes} codes, \
         {quantities} quantities, {rates} rates"
    )]
    ItemCountMismatch {
        descriptions: usize,
        codes: usize,
        quantities: usize,
        rates: usize,
    },

    /// A quantity is not a non-negative integer. `line` is 1-based.
    #[error("invalid quantity {value:?} on line {line}")]
    InvalidQuantity { line: usize, value: String },

    /// A rate is not a non-negative decimal number. `line` is 1-based.
    #[error("invalid rate {value:?} on line {line}")]
    InvalidRate { line: usize, value: String },

    /// Decimal arithmetic overflowed. `line` is set when a single line
    /// amount overflowed, `None` when the totals did.
    #[error("amount too large{}", overflow_location(.line))]
    AmountOverflow { line: Option<usize> },

    /// The renderer failed to produce the document bytes.
    #[error("failed to render document: {0}")]
    Render(#[from] io::Error),
}

impl InvoiceError {
    /// True for failures caused by the request content.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, InvoiceError::Render(_))
    }

    /// HTTP-style status classification for the transport layer.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

fn overflow_location(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" on line {}", line),
        None => String::new(),
    }
}

/// Failure while loading an [`InvoiceConfig`](crate::InvoiceConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
