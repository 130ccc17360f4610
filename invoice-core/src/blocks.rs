//! Renderer-independent document model.
//!
//! A composed document is an ordered `Vec<DocumentBlock>`; the order is the
//! reading order. Styles are plain values attached to the block that uses
//! them, never looked up from a shared table.

use crate::graphics::Color;

// -------------------------------------------------------
// Text
// -------------------------------------------------------

/// Font weight of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weight {
    Regular,
    Bold,
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Vertical alignment inside a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// A span of text with a single weight. A run with `Regular` weight
/// inherits the weight of its paragraph style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub weight: Weight,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            weight: Weight::Regular,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            weight: Weight::Bold,
        }
    }
}

/// Concatenate the text of a run list.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Typography for a heading or paragraph. All distances in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub name: &'static str,
    pub font_size: f64,
    pub leading: f64,
    pub weight: Weight,
    pub align: Align,
    pub space_before: f64,
    pub space_after: f64,
}

impl ParagraphStyle {
    /// Body text: 10/12 Helvetica, 6pt after.
    pub const BODY: ParagraphStyle = ParagraphStyle {
        name: "body",
        font_size: 10.0,
        leading: 12.0,
        weight: Weight::Regular,
        align: Align::Left,
        space_before: 0.0,
        space_after: 6.0,
    };

    /// Document title: 18/22 bold, centered, 18pt after.
    pub const TITLE: ParagraphStyle = ParagraphStyle {
        name: "title",
        font_size: 18.0,
        leading: 22.0,
        weight: Weight::Bold,
        align: Align::Center,
        space_before: 0.0,
        space_after: 18.0,
    };

    /// Section heading: 10/12 bold, 10pt before.
    pub const SECTION: ParagraphStyle = ParagraphStyle {
        name: "section",
        font_size: 10.0,
        leading: 12.0,
        weight: Weight::Bold,
        align: Align::Left,
        space_before: 10.0,
        space_after: 0.0,
    };
}

/// Styled text making up one heading or paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub runs: Vec<TextRun>,
    pub style: ParagraphStyle,
}

impl TextBlock {
    pub fn new(runs: Vec<TextRun>, style: ParagraphStyle) -> Self {
        TextBlock { runs, style }
    }

    pub fn text(&self) -> String {
        plain_text(&self.runs)
    }
}

// -------------------------------------------------------
// Tables
// -------------------------------------------------------

/// Content of one table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub runs: Vec<TextRun>,
    /// Wrap to the column width. Unwrapped cells render on one line.
    pub wrap: bool,
}

impl TableCell {
    /// Single-line text cell.
    pub fn text(text: impl Into<String>) -> Self {
        TableCell {
            runs: vec![TextRun::plain(text)],
            wrap: false,
        }
    }

    /// Wrapping cell built from styled runs.
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        TableCell { runs, wrap: true }
    }

    pub fn empty() -> Self {
        TableCell {
            runs: Vec::new(),
            wrap: false,
        }
    }

    pub fn plain_text(&self) -> String {
        plain_text(&self.runs)
    }
}

/// A rectangular range of cells given as `(column, row)` corners,
/// inclusive. Negative indices count from the end, so `-1` is the last
/// column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl CellRange {
    pub const fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        CellRange { start, end }
    }

    /// Every cell of the table.
    pub const fn all() -> Self {
        CellRange::new((0, 0), (-1, -1))
    }

    /// Every cell of one row.
    pub const fn row(row: i32) -> Self {
        CellRange::new((0, row), (-1, row))
    }

    /// Resolve to absolute inclusive bounds `(col0, row0, col1, row1)`.
    /// Returns `None` when the range selects nothing.
    pub fn resolve(&self, columns: usize, rows: usize) -> Option<(usize, usize, usize, usize)> {
        let c0 = resolve_index(self.start.0, columns)?;
        let r0 = resolve_index(self.start.1, rows)?;
        let c1 = resolve_index(self.end.0, columns)?;
        let r1 = resolve_index(self.end.1, rows)?;
        if c0 > c1 || r0 > r1 {
            return None;
        }
        Some((c0, r0, c1, r1))
    }
}

fn resolve_index(index: i32, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if index < 0 {
        len + index as i64
    } else {
        index as i64
    };
    if i < 0 || i >= len {
        None
    } else {
        Some(i as usize)
    }
}

/// A line drawn along a cell edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

/// One style attribute applied to a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellProperty {
    Background(Color),
    TextColor(Color),
    Weight(Weight),
    Align(Align),
    VAlign(VAlign),
    LeftPadding(f64),
    RightPadding(f64),
    /// Outline every cell of the range.
    Grid(Stroke),
    /// Lines between cells of the range, not around it.
    InnerGrid(Stroke),
}

/// Declarative table styling: apply `property` to every cell in `range`.
/// Rules apply in order; a later rule overrides an earlier one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleRule {
    pub range: CellRange,
    pub property: CellProperty,
}

impl StyleRule {
    pub const fn new(range: CellRange, property: CellProperty) -> Self {
        StyleRule { range, property }
    }
}

/// Strokes on the four edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Borders {
    pub top: Option<Stroke>,
    pub bottom: Option<Stroke>,
    pub left: Option<Stroke>,
    pub right: Option<Stroke>,
}

/// Effective style of one cell after all rules have been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub background: Option<Color>,
    pub text_color: Color,
    pub weight: Weight,
    pub align: Align,
    pub valign: VAlign,
    pub font_size: f64,
    pub leading: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub borders: Borders,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            background: None,
            text_color: Color::BLACK,
            weight: Weight::Regular,
            align: Align::Left,
            valign: VAlign::Bottom,
            font_size: 10.0,
            leading: 12.0,
            padding_left: 6.0,
            padding_right: 6.0,
            padding_top: 3.0,
            padding_bottom: 3.0,
            borders: Borders::default(),
        }
    }
}

/// A table: rows of cells, fixed column widths in points, style rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub rows: Vec<Vec<TableCell>>,
    pub column_widths: Vec<f64>,
    pub rules: Vec<StyleRule>,
}

impl TableBlock {
    pub fn new(column_widths: Vec<f64>) -> Self {
        TableBlock {
            rows: Vec::new(),
            column_widths,
            rules: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<TableCell>) -> &mut Self {
        self.rows.push(cells);
        self
    }

    pub fn push_rule(&mut self, range: CellRange, property: CellProperty) -> &mut Self {
        self.rules.push(StyleRule::new(range, property));
        self
    }

    pub fn width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Resolve the effective style of cell `(row, col)`.
    pub fn cell_style(&self, row: usize, col: usize) -> CellStyle {
        let mut style = CellStyle::default();
        let (cols, rows) = (self.column_count(), self.row_count());
        for rule in &self.rules {
            let Some((c0, r0, c1, r1)) = rule.range.resolve(cols, rows) else {
                continue;
            };
            if col < c0 || col > c1 || row < r0 || row > r1 {
                continue;
            }
            match rule.property {
                CellProperty::Background(c) => style.background = Some(c),
                CellProperty::TextColor(c) => style.text_color = c,
                CellProperty::Weight(w) => style.weight = w,
                CellProperty::Align(a) => style.align = a,
                CellProperty::VAlign(v) => style.valign = v,
                CellProperty::LeftPadding(p) => style.padding_left = p,
                CellProperty::RightPadding(p) => style.padding_right = p,
                CellProperty::Grid(stroke) => {
                    style.borders = Borders {
                        top: Some(stroke),
                        bottom: Some(stroke),
                        left: Some(stroke),
                        right: Some(stroke),
                    };
                }
                CellProperty::InnerGrid(stroke) => {
                    if row > r0 {
                        style.borders.top = Some(stroke);
                    }
                    if row < r1 {
                        style.borders.bottom = Some(stroke);
                    }
                    if col > c0 {
                        style.borders.left = Some(stroke);
                    }
                    if col < c1 {
                        style.borders.right = Some(stroke);
                    }
                }
            }
        }
        style
    }
}

// -------------------------------------------------------
// Blocks
// -------------------------------------------------------

/// One renderable unit of a composed document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBlock {
    Heading(TextBlock),
    Paragraph(TextBlock),
    Table(TableBlock),
    /// Vertical gap in points.
    Spacer(f64),
}

impl DocumentBlock {
    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            DocumentBlock::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            DocumentBlock::Heading(t) | DocumentBlock::Paragraph(t) => Some(t),
            _ => None,
        }
    }
}
