use std::io;

use crate::blocks::DocumentBlock;

/// Turns a composed block sequence into document bytes.
pub trait DocumentRenderer {
    /// MIME type of the bytes `render` produces.
    fn content_type(&self) -> &'static str;

    /// Render `blocks` in order. `title` goes into document metadata.
    fn render(&self, blocks: &[DocumentBlock], title: &str) -> io::Result<Vec<u8>>;
}
