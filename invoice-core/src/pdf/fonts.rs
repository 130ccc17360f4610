use crate::blocks::Weight;

/// The two standard PDF fonts an invoice is set in. Both are available in
/// every viewer without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 2] = [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold];

    pub fn for_weight(weight: Weight) -> Self {
        match weight {
            Weight::Regular => BuiltinFont::Helvetica,
            Weight::Bold => BuiltinFont::HelveticaBold,
        }
    }

    /// Resource name used in content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
        }
    }

    /// PDF `BaseFont` name.
    pub fn base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Glyph advance in 1/1000 em.
    pub fn char_width(self, ch: char) -> u16 {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return FALLBACK_WIDTH;
        }
        let index = (code - 32) as usize;
        match self {
            BuiltinFont::Helvetica => HELVETICA_WIDTHS[index],
            BuiltinFont::HelveticaBold => HELVETICA_BOLD_WIDTHS[index],
        }
    }

    /// Width of `text` in points at `size`.
    pub fn measure(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| self.char_width(ch) as u32).sum();
        units as f64 * size / 1000.0
    }
}

/// Width used for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica advances for ASCII 32..=126, from the Adobe AFM.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advances for ASCII 32..=126, from the Adobe AFM.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
