pub mod blocks;
pub mod calculator;
pub mod composer;
pub mod config;
pub mod error;
pub mod graphics;
pub mod model;
pub mod money;
pub mod normalize;
pub mod pdf;
pub mod pipeline;
pub mod render;

pub use blocks::{DocumentBlock, ParagraphStyle, TableBlock, TextBlock};
pub use calculator::{InvoiceCalculator, GST_RATES};
pub use composer::DocumentComposer;
pub use config::InvoiceConfig;
pub use error::{ConfigError, InvoiceError, InvoiceResult};
pub use model::{Invoice, LineItem, TaxBreakdown, TaxComponent, TaxRate};
pub use money::DisplayTotals;
pub use normalize::{FieldNormalizer, ItemFields};
pub use pdf::PdfRenderer;
pub use pipeline::{generate_invoice, generate_with, InvoiceFile, InvoiceRequest};
pub use render::DocumentRenderer;
