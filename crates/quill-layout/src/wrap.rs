//! Monospace line breaking.
//!
//! [`MonospaceLayout`] breaks every paragraph into lines that fit a given
//! width, asking [`LayoutMetrics`] for each line's inset as it goes. A
//! continuation line's indent depends on glyph positions of the first line
//! of its paragraph, which is always laid out by the time it is asked for.
//!
//! Breaking is per char, not per word. Every line takes at least one char
//! so an indent wider than the container still makes progress. Terminators
//! have no width, and tabs advance to the next tab stop.
//!
//! A buffer that is empty or ends in a terminator gets one extra empty line
//! at `len`, where a caret after the final newline would sit.

use quill_text::paragraph::is_terminator;
use quill_text::{AttributedCache, CharRange, ContractViolation, Result};

use crate::geometry::{LineFragment, Point, Rect};
use crate::measure::{GlyphLayout, Monospace, TextMeasure};
use crate::metrics::{ControlCharacterAction, LayoutMetrics};

/// Tolerance for float accumulation when checking whether a glyph fits.
const FIT_EPSILON: f32 = 1e-3;

/// Line fragments plus the x offset of every glyph within its line.
#[derive(Debug, Clone, Default)]
pub struct MonospaceLayout {
    lines: Vec<LineFragment>,
    /// `xs[i]` is the x of char `i` relative to its line's origin. One
    /// extra entry for `len`.
    xs: Vec<f32>,
}

impl MonospaceLayout {
    /// Lay out the cache's whole content into lines `width` points wide.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::LayoutWithoutContent`] before content is set.
    pub fn build(cache: &AttributedCache, metrics: &LayoutMetrics, width: f32) -> Result<Self> {
        let buffer = cache
            .content()
            .ok_or(ContractViolation::LayoutWithoutContent)?;
        let font = cache.font();
        let len = buffer.len();
        let chars: Vec<char> = buffer.rope().chars().collect();

        let natural = Monospace::line_height(font);
        let advance_y = natural + metrics.line_spacing_extra(natural);

        let mut layout = Self {
            lines: Vec::new(),
            xs: vec![0.0; len + 1],
        };
        let mut y = 0.0;

        for paragraph in buffer.paragraph_ranges(CharRange::new(0, len))? {
            let mut start = paragraph.start;
            loop {
                let available = metrics.container_width(cache, &layout, start, width)?;
                let mut x = 0.0;
                let mut end = start;
                while end < paragraph.end {
                    let advance = Self::advance(cache, metrics, &chars, end, x)?;
                    if end > start && x + advance > available + FIT_EPSILON {
                        break;
                    }
                    layout.xs[end] = x;
                    x += advance;
                    end += 1;
                }
                layout.xs[end] = x;

                let rect = metrics.fragment_rect(
                    cache,
                    &layout,
                    start,
                    Rect::new(0.0, y, available, natural),
                )?;
                layout.lines.push(LineFragment {
                    chars: CharRange::new(start, end),
                    rect,
                });
                y += advance_y;

                if end >= paragraph.end {
                    break;
                }
                start = end;
            }
        }

        if chars.last().is_none_or(|&c| is_terminator(c)) {
            let available = metrics.container_width(cache, &layout, len, width)?;
            let rect =
                metrics.fragment_rect(cache, &layout, len, Rect::new(0.0, y, available, natural))?;
            layout.xs[len] = 0.0;
            layout.lines.push(LineFragment {
                chars: CharRange::point(len),
                rect,
            });
        }

        Ok(layout)
    }

    /// Width of the glyph for `chars[index]` when it starts at `x`.
    fn advance(
        cache: &AttributedCache,
        metrics: &LayoutMetrics,
        chars: &[char],
        index: usize,
        x: f32,
    ) -> Result<f32> {
        let ch = chars[index];
        if is_terminator(ch) {
            return Ok(0.0);
        }
        if ch.is_control() {
            let action = metrics.control_character_action(
                cache,
                index,
                ControlCharacterAction::ZeroAdvancement,
            )?;
            return Ok(match action {
                ControlCharacterAction::Whitespace => metrics
                    .tab_stop_rect_for_font(Point::new(x, 0.0), &Monospace, cache.font())
                    .size
                    .width,
                _ => 0.0,
            });
        }
        let mut utf8 = [0; 4];
        Ok(Monospace.measure(ch.encode_utf8(&mut utf8), cache.font()))
    }

    /// All line fragments, top to bottom.
    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &[LineFragment] {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Bottom edge of the last line.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.lines.last().map_or(0.0, |l| l.rect.max_y())
    }

    fn line_index(&self, char_index: usize) -> Option<usize> {
        self.lines
            .partition_point(|l| l.chars.start <= char_index)
            .checked_sub(1)
    }
}

impl GlyphLayout for MonospaceLayout {
    fn line_range(&self, char_index: usize) -> CharRange {
        self.line_index(char_index)
            .map_or(CharRange::point(char_index), |i| self.lines[i].chars)
    }

    fn glyph_position(&self, char_index: usize) -> Point {
        Point::new(self.xs.get(char_index).copied().unwrap_or(0.0), 0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
