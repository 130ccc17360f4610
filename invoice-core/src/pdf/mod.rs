//! PDF output: object model, serializer, builtin font metrics, and the
//! block-flow renderer.

pub mod document;
pub mod fonts;
pub mod objects;
pub mod renderer;
pub mod writer;

pub use document::{PdfDocument, TextSpan};
pub use fonts::BuiltinFont;
pub use renderer::PdfRenderer;
