use std::io::{self, Write};
use std::mem;

use tracing::debug;

use super::document::{PdfDocument, TextSpan};
use super::fonts::BuiltinFont;
use crate::blocks::{Align, CellStyle, DocumentBlock, TableBlock, TextBlock, TextRun, VAlign, Weight};
use crate::config::PageConfig;
use crate::graphics::Color;
use crate::render::DocumentRenderer;

/// Tolerance when checking whether content fits above the bottom margin.
const FIT_EPSILON: f64 = 1e-6;

/// Renders blocks top to bottom into fixed-size PDF pages.
///
/// Text is set in Helvetica and Helvetica-Bold. Paragraphs and table rows
/// that do not fit move to a new page; a table row is never split.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    page: PageConfig,
}

impl PdfRenderer {
    pub fn new(page: PageConfig) -> Self {
        PdfRenderer { page }
    }

    /// Render into an arbitrary writer and return it.
    pub fn render_to<W: Write>(
        &self,
        blocks: &[DocumentBlock],
        title: &str,
        writer: W,
    ) -> io::Result<W> {
        let mut doc = PdfDocument::new(writer)?;
        doc.set_compression(self.page.compress);
        doc.set_info("Title", title);
        doc.set_info("Creator", "invoice-core");
        {
            let mut flow = Flow::start(&mut doc, &self.page)?;
            for block in blocks {
                flow.place(block)?;
            }
        }
        doc.end_document()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, blocks: &[DocumentBlock], title: &str) -> io::Result<Vec<u8>> {
        self.render_to(blocks, title, Vec::new())
    }
}

// -------------------------------------------------------
// Line breaking
// -------------------------------------------------------

/// One laid-out line: font spans and their total width in points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<TextSpan>,
    pub width: f64,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn push(&mut self, font: BuiltinFont, text: &str, width: f64) {
        match self.spans.last_mut() {
            Some(last) if last.font == font => last.text.push_str(text),
            _ => self.spans.push(TextSpan {
                font,
                text: text.to_string(),
            }),
        }
        self.width += width;
    }
}

enum Token {
    Word {
        text: String,
        font: BuiltinFont,
        leading_space: bool,
    },
    Break,
}

/// Split runs into words. A run with `Regular` weight takes `base`.
/// Whitespace at a run boundary still separates the neighbouring words.
fn tokenize(runs: &[TextRun], base: Weight) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut had_space = false;
    for run in runs {
        let weight = match run.weight {
            Weight::Bold => Weight::Bold,
            Weight::Regular => base,
        };
        let font = BuiltinFont::for_weight(weight);
        let mut word = String::new();
        for ch in run.text.chars() {
            if ch == '\n' || ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word {
                        text: mem::take(&mut word),
                        font,
                        leading_space: had_space,
                    });
                }
                if ch == '\n' {
                    tokens.push(Token::Break);
                    had_space = false;
                } else {
                    had_space = true;
                }
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            tokens.push(Token::Word {
                text: word,
                font,
                leading_space: had_space,
            });
            had_space = false;
        }
    }
    tokens
}

/// Break `runs` into lines no wider than `max_width`. With `None` only
/// explicit newlines break. A word wider than the limit gets a line of its
/// own and overflows it. Always returns at least one line.
pub fn wrap_runs(runs: &[TextRun], base: Weight, size: f64, max_width: Option<f64>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();

    for token in tokenize(runs, base) {
        match token {
            Token::Break => lines.push(mem::take(&mut current)),
            Token::Word {
                text,
                font,
                leading_space,
            } => {
                let word_width = font.measure(&text, size);
                let mut space = leading_space && !current.is_empty();
                let space_width = font.measure(" ", size);
                if let Some(max) = max_width {
                    let needed = current.width
                        + if space { space_width } else { 0.0 }
                        + word_width;
                    if !current.is_empty() && needed > max + FIT_EPSILON {
                        lines.push(mem::take(&mut current));
                        space = false;
                    }
                }
                if space {
                    current.push(font, " ", space_width);
                }
                current.push(font, &text, word_width);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn align_offset(align: Align, available: f64, used: f64) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (available - used) / 2.0,
        Align::Right => available - used,
    }
}

// -------------------------------------------------------
// Page flow
// -------------------------------------------------------

struct CellLayout {
    style: CellStyle,
    lines: Vec<Line>,
}

impl CellLayout {
    fn height(&self) -> f64 {
        self.lines.len() as f64 * self.style.leading + self.style.padding_top + self.style.padding_bottom
    }
}

/// Vertical cursor over the current page.
struct Flow<'a, W: Write> {
    doc: &'a mut PdfDocument<W>,
    page: &'a PageConfig,
    /// Top of the free area, in PDF coordinates.
    y: f64,
    /// Nothing has been placed on the current page yet.
    fresh: bool,
}

impl<'a, W: Write> Flow<'a, W> {
    fn start(doc: &'a mut PdfDocument<W>, page: &'a PageConfig) -> io::Result<Self> {
        let mut flow = Flow {
            doc,
            page,
            y: 0.0,
            fresh: true,
        };
        flow.new_page()?;
        Ok(flow)
    }

    fn top(&self) -> f64 {
        self.page.height - self.page.margin_top
    }

    fn bottom(&self) -> f64 {
        self.page.margin_bottom
    }

    fn new_page(&mut self) -> io::Result<()> {
        self.doc.begin_page(self.page.width, self.page.height)?;
        self.y = self.top();
        self.fresh = true;
        debug!(page = self.doc.page_count(), "started page");
        Ok(())
    }

    fn fits(&self, height: f64) -> bool {
        self.y - height >= self.bottom() - FIT_EPSILON
    }

    /// Make room for `height`, turning the page if needed. Content taller
    /// than a whole page is placed anyway and overflows the bottom margin.
    fn reserve(&mut self, height: f64) -> io::Result<()> {
        if !self.fits(height) && !self.fresh {
            self.new_page()?;
        }
        Ok(())
    }

    fn place(&mut self, block: &DocumentBlock) -> io::Result<()> {
        match block {
            DocumentBlock::Heading(text) | DocumentBlock::Paragraph(text) => self.place_text(text),
            DocumentBlock::Table(table) => self.place_table(table),
            DocumentBlock::Spacer(height) => self.place_spacer(*height),
        }
    }

    fn place_spacer(&mut self, height: f64) -> io::Result<()> {
        // Spacers are dropped at the top of a page.
        if self.fresh {
            return Ok(());
        }
        if self.fits(height) {
            self.y -= height;
            Ok(())
        } else {
            self.new_page()
        }
    }

    fn place_text(&mut self, block: &TextBlock) -> io::Result<()> {
        let style = &block.style;
        if !self.fresh {
            self.y -= style.space_before;
        }
        let width = self.page.frame_width();
        let lines = wrap_runs(&block.runs, style.weight, style.font_size, Some(width));
        for line in &lines {
            self.reserve(style.leading)?;
            let x = self.page.margin_left + align_offset(style.align, width, line.width);
            let baseline = self.y - style.font_size;
            self.doc
                .text_line(&line.spans, x, baseline, style.font_size, Color::BLACK)?;
            self.y -= style.leading;
            self.fresh = false;
        }
        self.y -= style.space_after;
        Ok(())
    }

    fn place_table(&mut self, table: &TableBlock) -> io::Result<()> {
        let frame = self.page.frame_width();
        let left = self.page.margin_left + (frame - table.width()) / 2.0;

        for row in 0..table.row_count() {
            let cells: Vec<CellLayout> = table
                .column_widths
                .iter()
                .enumerate()
                .map(|(col, &width)| layout_cell(table, row, col, width))
                .collect();
            let height = cells.iter().map(CellLayout::height).fold(0.0_f64, f64::max);
            self.reserve(height)?;

            let top = self.y;
            let bottom = top - height;

            let mut x = left;
            for (cell, &width) in cells.iter().zip(&table.column_widths) {
                if let Some(bg) = cell.style.background {
                    self.doc.fill_rect(x, bottom, width, height, bg)?;
                }
                x += width;
            }

            let mut x = left;
            for (cell, &width) in cells.iter().zip(&table.column_widths) {
                self.draw_cell_text(cell, x, top, width, height)?;
                x += width;
            }

            let mut x = left;
            for (cell, &width) in cells.iter().zip(&table.column_widths) {
                let b = cell.style.borders;
                if let Some(s) = b.top {
                    self.doc.line((x, top), (x + width, top), s)?;
                }
                if let Some(s) = b.bottom {
                    self.doc.line((x, bottom), (x + width, bottom), s)?;
                }
                if let Some(s) = b.left {
                    self.doc.line((x, top), (x, bottom), s)?;
                }
                if let Some(s) = b.right {
                    self.doc.line((x + width, top), (x + width, bottom), s)?;
                }
                x += width;
            }

            self.y = bottom;
            self.fresh = false;
        }
        Ok(())
    }

    fn draw_cell_text(
        &mut self,
        cell: &CellLayout,
        x: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> io::Result<()> {
        let style = &cell.style;
        let inner_top = top - style.padding_top;
        let inner_bottom = top - height + style.padding_bottom;
        let content = cell.lines.len() as f64 * style.leading;
        let text_top = match style.valign {
            VAlign::Top => inner_top,
            VAlign::Middle => (inner_top + inner_bottom + content) / 2.0,
            VAlign::Bottom => inner_bottom + content,
        };
        let available = width - style.padding_left - style.padding_right;

        for (i, line) in cell.lines.iter().enumerate() {
            let lx = x + style.padding_left + align_offset(style.align, available, line.width);
            let baseline = text_top - style.font_size - i as f64 * style.leading;
            self.doc
                .text_line(&line.spans, lx, baseline, style.font_size, style.text_color)?;
        }
        Ok(())
    }
}

fn layout_cell(table: &TableBlock, row: usize, col: usize, width: f64) -> CellLayout {
    let style = table.cell_style(row, col);
    let lines = match table.cell(row, col) {
        Some(cell) => {
            let limit = cell
                .wrap
                .then(|| width - style.padding_left - style.padding_right);
            wrap_runs(&cell.runs, style.weight, style.font_size, limit)
        }
        None => vec![Line::default()],
    };
    CellLayout { style, lines }
}
