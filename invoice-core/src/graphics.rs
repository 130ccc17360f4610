/// RGB color used by document styles.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::gray(0.0);
    pub const WHITE: Color = Color::gray(1.0);
    pub const GREY: Color = Color::gray(0.5);

    /// Create a color from RGB components (each 0.0–1.0).
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub const fn gray(level: f64) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Create a color from 8-bit channels, as written in `#rrggbb` notation.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}
