//! Measurement seams.
//!
//! Layout metrics never rasterize or shape text. Whatever owns glyphs
//! implements these two traits and passes itself in:
//!
//! - [`TextMeasure`] answers "how wide is this string in this font".
//! - [`GlyphLayout`] answers "which laid-out line holds this char, and where
//!   is its glyph on that line".
//!
//! [`Monospace`] is a fixed-pitch `TextMeasure` (every column is
//! `size * 0.6` wide) used by the terminal front end and by tests.

use quill_text::{CharRange, Font};
use unicode_width::UnicodeWidthStr;

use crate::geometry::Point;

/// Width of rendered text.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &Font) -> f32;
}

/// Positions produced by line breaking.
pub trait GlyphLayout {
    /// Chars of the laid-out line holding `char_index`.
    fn line_range(&self, char_index: usize) -> CharRange;

    /// Position of the glyph for `char_index`, relative to its line's origin.
    fn glyph_position(&self, char_index: usize) -> Point;
}

/// Fixed-pitch measurement: one column per narrow char, two per wide char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Monospace;

impl Monospace {
    /// Advance of a single column.
    #[inline]
    #[must_use]
    pub fn cell_width(font: &Font) -> f32 {
        font.size() * 0.6
    }

    #[inline]
    #[must_use]
    pub fn line_height(font: &Font) -> f32 {
        font.size() * 1.2
    }

    /// Terminal columns `text` occupies.
    #[inline]
    #[must_use]
    pub fn columns(text: &str) -> usize {
        text.width()
    }
}

impl TextMeasure for Monospace {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font: &Font) -> f32 {
        Self::columns(text) as f32 * Self::cell_width(font)
    }
}
