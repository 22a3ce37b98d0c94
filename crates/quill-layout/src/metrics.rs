//! Layout metrics: per-line insets, tab stops, and line spacing.
//!
//! `LayoutMetrics` owns configuration and nothing else. Every query reads
//! the current content from the [`AttributedCache`] and positions from an
//! injected [`GlyphLayout`], so answers are never stale and nothing is
//! cached between calls.
//!
//! # Wrap indent
//!
//! A wrapped continuation line is indented to line up with the first line
//! of its paragraph:
//!
//! ```text
//! 1 │ call_something(first_argument,
//!   │                second_argument)      one past the first `( { [`
//! 2 │     plain words that run on and
//!   │         on past the edge              first non-blank + 4
//! ```
//!
//! The indent is the glyph-position distance between the paragraph's first
//! char and that indent point, both on the paragraph's first line. An
//! indent point past the end of the first line is pulled back to its last
//! char. A first line with neither a bracket nor a non-blank char adds no
//! indent.

use log::debug;
use quill_text::paragraph::is_blank;
use quill_text::{AttributedCache, CharRange, ContractViolation, Font, Result, TextBuffer};

use crate::error::ConfigError;
use crate::geometry::{Insets, Point, Rect};
use crate::measure::{GlyphLayout, TextMeasure};

/// Chars after which a continuation line is aligned.
const INDENT_BRACKETS: [char; 3] = ['(', '{', '['];

/// Extra columns past the first non-blank char when no bracket is found.
const FALLBACK_INDENT: usize = 4;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Layout configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Reserve a numbering gutter on the left.
    pub gutter_enabled: bool,
    /// Gutter width in points.
    pub gutter_width: f32,
    /// Tab stop spacing in reference-glyph widths. Always > 0.
    pub tab_width: usize,
    /// Line height as a multiple of the natural height. Values below 1 act
    /// as 1.
    pub line_height_multiplier: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gutter_enabled: false,
            gutter_width: 16.0,
            tab_width: 2,
            line_height_multiplier: 1.0,
        }
    }
}

/// What a configuration change requires of the layout consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The value did not change.
    Nothing,
    /// Every line must be broken and positioned again.
    All,
}

impl Invalidation {
    /// The char range to invalidate for a buffer of `len` chars.
    #[must_use]
    pub const fn range(self, len: usize) -> Option<CharRange> {
        match self {
            Self::Nothing => None,
            Self::All => Some(CharRange::new(0, len)),
        }
    }
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// How one laid-out line starts. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    pub start: usize,
    pub left_inset: f32,
    pub is_wrap_continuation: bool,
}

/// How the line breaker should treat a control char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCharacterAction {
    ZeroAdvancement,
    /// Take up space like a blank; the width comes from the tab stop rect.
    Whitespace,
    HorizontalTab,
    LineBreak,
    ParagraphBreak,
}

// ---------------------------------------------------------------------------
// LayoutMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LayoutMetrics {
    config: LayoutConfig,
}

impl LayoutMetrics {
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    // -- Setters ------------------------------------------------------------

    pub fn set_gutter_enabled(&mut self, enabled: bool) -> Invalidation {
        if self.config.gutter_enabled == enabled {
            return Invalidation::Nothing;
        }
        self.config.gutter_enabled = enabled;
        changed("gutter", enabled)
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for negative or non-finite widths.
    pub fn set_gutter_width(&mut self, width: f32) -> std::result::Result<Invalidation, ConfigError> {
        if !width.is_finite() || width < 0.0 {
            return Err(ConfigError::invalid("gutterwidth", width));
        }
        if (self.config.gutter_width - width).abs() < f32::EPSILON {
            return Ok(Invalidation::Nothing);
        }
        self.config.gutter_width = width;
        Ok(changed("gutter width", width))
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for zero.
    pub fn set_tab_width(&mut self, tab_width: usize) -> std::result::Result<Invalidation, ConfigError> {
        if tab_width == 0 {
            return Err(ConfigError::invalid("tabstop", tab_width));
        }
        if self.config.tab_width == tab_width {
            return Ok(Invalidation::Nothing);
        }
        self.config.tab_width = tab_width;
        Ok(changed("tab width", tab_width))
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for negative or non-finite values.
    pub fn set_line_height_multiplier(
        &mut self,
        multiplier: f32,
    ) -> std::result::Result<Invalidation, ConfigError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ConfigError::invalid("lineheight", multiplier));
        }
        if (self.config.line_height_multiplier - multiplier).abs() < f32::EPSILON {
            return Ok(Invalidation::Nothing);
        }
        self.config.line_height_multiplier = multiplier;
        Ok(changed("line height", multiplier))
    }

    // -- Insets -------------------------------------------------------------

    /// Insets for the laid-out line starting at `char_index`: the gutter
    /// (when enabled) plus the wrap indent for continuation lines.
    ///
    /// # Errors
    ///
    /// - [`ContractViolation::LayoutWithoutContent`] before content is set.
    /// - [`TextError::OutOfBounds`](quill_text::TextError::OutOfBounds) when
    ///   `char_index > len`.
    pub fn left_inset<L>(&self, cache: &AttributedCache, layout: &L, char_index: usize) -> Result<Insets>
    where
        L: GlyphLayout + ?Sized,
    {
        self.line_layout(cache, layout, char_index)
            .map(|line| Insets::left(line.left_inset))
    }

    /// The full [`LineLayout`] record for the line starting at `char_index`.
    ///
    /// # Errors
    ///
    /// Same as [`left_inset`](Self::left_inset).
    pub fn line_layout<L>(&self, cache: &AttributedCache, layout: &L, char_index: usize) -> Result<LineLayout>
    where
        L: GlyphLayout + ?Sized,
    {
        let buffer = content(cache)?;
        let paragraph = buffer.paragraph_range(CharRange::point(char_index))?;
        let is_wrap_continuation = paragraph.start < char_index;

        let mut left = if self.config.gutter_enabled {
            self.config.gutter_width
        } else {
            0.0
        };
        if is_wrap_continuation {
            left += wrap_indent(buffer, layout, paragraph)?;
        }

        Ok(LineLayout {
            start: char_index,
            left_inset: left,
            is_wrap_continuation,
        })
    }

    /// `proposed` moved right by the left inset of its line.
    ///
    /// # Errors
    ///
    /// Same as [`left_inset`](Self::left_inset).
    pub fn fragment_rect<L>(
        &self,
        cache: &AttributedCache,
        layout: &L,
        char_index: usize,
        proposed: Rect,
    ) -> Result<Rect>
    where
        L: GlyphLayout + ?Sized,
    {
        let insets = self.left_inset(cache, layout, char_index)?;
        Ok(proposed.offset_x(insets.left))
    }

    /// Width left for text on the line starting at `char_index`.
    ///
    /// # Errors
    ///
    /// Same as [`left_inset`](Self::left_inset).
    pub fn container_width<L>(
        &self,
        cache: &AttributedCache,
        layout: &L,
        char_index: usize,
        proposed_width: f32,
    ) -> Result<f32>
    where
        L: GlyphLayout + ?Sized,
    {
        let insets = self.left_inset(cache, layout, char_index)?;
        Ok(proposed_width - insets.horizontal())
    }

    // -- Tabs ---------------------------------------------------------------

    /// The box a tab at `position` occupies: from `position.x` to the next
    /// tab stop. Stops are `reference_width * tab_width` apart and rounding
    /// is centred half a reference glyph early.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tab_stop_rect(&self, position: Point, reference_width: f32) -> Rect {
        let cell = reference_width * self.config.tab_width as f32;
        if cell <= 0.0 {
            return Rect::new(position.x, position.y, 0.0, 0.0);
        }
        let stop = ((position.x + reference_width / 2.0) / cell + 1.0).floor() * cell;
        Rect::new(position.x, position.y, stop - position.x, 0.0)
    }

    /// [`tab_stop_rect`](Self::tab_stop_rect) with `"n"` in `font` as the
    /// reference glyph.
    #[must_use]
    pub fn tab_stop_rect_for_font<M>(&self, position: Point, measure: &M, font: &Font) -> Rect
    where
        M: TextMeasure + ?Sized,
    {
        self.tab_stop_rect(position, measure.measure("n", font))
    }

    // -- Spacing and control chars -----------------------------------------

    /// Space added after a line on top of its natural height.
    #[must_use]
    pub fn line_spacing_extra(&self, proposed_line_height: f32) -> f32 {
        (self.config.line_height_multiplier.max(1.0) - 1.0) * proposed_line_height
    }

    /// Tabs are laid out as whitespace sized by their tab stop rect; every
    /// other control char keeps the proposed action.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::LayoutWithoutContent`] before content is set,
    /// [`TextError::OutOfBounds`](quill_text::TextError::OutOfBounds) for an
    /// index past the last char.
    pub fn control_character_action(
        &self,
        cache: &AttributedCache,
        char_index: usize,
        proposed: ControlCharacterAction,
    ) -> Result<ControlCharacterAction> {
        let ch = content(cache)?.char_at(char_index)?;
        Ok(if ch == '\t' {
            ControlCharacterAction::Whitespace
        } else {
            proposed
        })
    }
}

fn content(cache: &AttributedCache) -> Result<&TextBuffer> {
    Ok(cache
        .content()
        .ok_or(ContractViolation::LayoutWithoutContent)?)
}

fn changed(what: &str, value: impl std::fmt::Display) -> Invalidation {
    debug!("{what} set to {value}, full relayout");
    Invalidation::All
}

/// Horizontal indent for continuation lines of `paragraph`.
fn wrap_indent<L>(buffer: &TextBuffer, layout: &L, paragraph: CharRange) -> Result<f32>
where
    L: GlyphLayout + ?Sized,
{
    let line = layout.line_range(paragraph.start);
    let first_line = CharRange::new(paragraph.start, line.end.clamp(paragraph.start, paragraph.end));
    if first_line.is_empty() {
        return Ok(0.0);
    }

    let chars: Vec<char> = buffer.slice(first_line)?.chars().collect();
    let indent_col = chars
        .iter()
        .position(|c| INDENT_BRACKETS.contains(c))
        .map(|i| i + 1)
        .or_else(|| chars.iter().position(|&c| !is_blank(c)).map(|i| i + FALLBACK_INDENT));
    let Some(col) = indent_col else {
        return Ok(0.0);
    };

    let indent_point = first_line.start + col.min(first_line.len() - 1);
    let dx = layout.glyph_position(indent_point).x - layout.glyph_position(paragraph.start).x;
    Ok(dx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Monospace;
    use pretty_assertions::assert_eq;
    use quill_text::{Classifier, TextBuffer, TextError};

    /// Fixed line breaks, every char one `cell` wide.
    struct FixedLines {
        lines: Vec<CharRange>,
        cell: f32,
    }

    impl FixedLines {
        fn new(breaks: &[(usize, usize)]) -> Self {
            Self {
                lines: breaks.iter().map(|&(s, e)| CharRange::new(s, e)).collect(),
                cell: 6.0,
            }
        }
    }

    impl GlyphLayout for FixedLines {
        fn line_range(&self, char_index: usize) -> CharRange {
            self.lines
                .iter()
                .copied()
                .find(|l| l.contains(char_index))
                .unwrap_or_else(|| CharRange::point(char_index))
        }

        #[allow(clippy::cast_precision_loss)]
        fn glyph_position(&self, char_index: usize) -> Point {
            let line = self.line_range(char_index);
            Point::new((char_index - line.start) as f32 * self.cell, 0.0)
        }
    }

    fn cache(text: &str) -> AttributedCache {
        let mut cache = AttributedCache::new(Classifier::default(), Font::default());
        cache.set_content(TextBuffer::from_text(text)).unwrap();
        cache
    }

    fn gutter_on() -> LayoutMetrics {
        LayoutMetrics::new(LayoutConfig {
            gutter_enabled: true,
            ..LayoutConfig::default()
        })
    }

    // -- Defaults -----------------------------------------------------------

    #[test]
    fn default_config() {
        let config = LayoutConfig::default();
        assert!(!config.gutter_enabled);
        assert_eq!(config.gutter_width, 16.0);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.line_height_multiplier, 1.0);
    }

    // -- Insets -------------------------------------------------------------

    #[test]
    fn first_line_gets_only_the_gutter() {
        let cache = cache("int x;\n");
        let layout = FixedLines::new(&[(0, 7)]);
        assert_eq!(
            LayoutMetrics::default().left_inset(&cache, &layout, 0).unwrap(),
            Insets::left(0.0)
        );
        assert_eq!(gutter_on().left_inset(&cache, &layout, 0).unwrap(), Insets::left(16.0));
    }

    #[test]
    fn continuation_aligns_after_bracket() {
        let cache = cache("foo(bar, baz)\n");
        let layout = FixedLines::new(&[(0, 8), (8, 14)]);
        let line = gutter_on().line_layout(&cache, &layout, 8).unwrap();
        assert!(line.is_wrap_continuation);
        assert_eq!(line.left_inset, 16.0 + 4.0 * 6.0);
    }

    #[test]
    fn continuation_falls_back_to_first_text_plus_four() {
        let cache = cache("    alpha beta gamma\n");
        let layout = FixedLines::new(&[(0, 15), (15, 21)]);
        let insets = LayoutMetrics::default().left_inset(&cache, &layout, 15).unwrap();
        assert_eq!(insets, Insets::left(8.0 * 6.0));
    }

    #[test]
    fn blank_first_line_adds_no_indent() {
        let cache = cache("      x\n");
        let layout = FixedLines::new(&[(0, 3), (3, 8)]);
        let insets = LayoutMetrics::default().left_inset(&cache, &layout, 3).unwrap();
        assert_eq!(insets, Insets::left(0.0));
    }

    #[test]
    fn indent_point_clamped_to_first_line() {
        let cache = cache("abcdef");
        let layout = FixedLines::new(&[(0, 3), (3, 6)]);
        let insets = LayoutMetrics::default().left_inset(&cache, &layout, 3).unwrap();
        assert_eq!(insets, Insets::left(2.0 * 6.0));
    }

    #[test]
    fn indent_measured_from_paragraph_start() {
        let cache = cache("x\n{ a b c\n");
        let layout = FixedLines::new(&[(0, 2), (2, 6), (6, 10)]);
        let insets = LayoutMetrics::default().left_inset(&cache, &layout, 6).unwrap();
        assert_eq!(insets, Insets::left(6.0));
    }

    #[test]
    fn extra_line_after_final_newline() {
        let cache = cache("int x;\n");
        let layout = FixedLines::new(&[(0, 7)]);
        let line = gutter_on().line_layout(&cache, &layout, 7).unwrap();
        assert!(!line.is_wrap_continuation);
        assert_eq!(line.left_inset, 16.0);
    }

    #[test]
    fn fragment_and_container_follow_inset() {
        let cache = cache("f(a, b)\n");
        let layout = FixedLines::new(&[(0, 4), (4, 8)]);
        let metrics = gutter_on();
        let rect = metrics
            .fragment_rect(&cache, &layout, 4, Rect::new(0.0, 20.0, 100.0, 15.6))
            .unwrap();
        assert_eq!(rect, Rect::new(28.0, 20.0, 100.0, 15.6));
        assert_eq!(metrics.container_width(&cache, &layout, 4, 100.0).unwrap(), 72.0);
    }

    // -- Errors -------------------------------------------------------------

    #[test]
    fn query_before_content_is_a_contract_violation() {
        let cache = AttributedCache::new(Classifier::default(), Font::default());
        let layout = FixedLines::new(&[]);
        assert_eq!(
            LayoutMetrics::default().left_inset(&cache, &layout, 0),
            Err(TextError::Contract(ContractViolation::LayoutWithoutContent))
        );
    }

    #[test]
    fn query_past_end_is_out_of_bounds() {
        let cache = cache("ab");
        let layout = FixedLines::new(&[(0, 2)]);
        assert!(matches!(
            LayoutMetrics::default().left_inset(&cache, &layout, 3),
            Err(TextError::OutOfBounds { .. })
        ));
    }

    // -- Tabs ---------------------------------------------------------------

    #[test]
    fn tab_stop_from_reference_width() {
        let mut metrics = LayoutMetrics::default();
        metrics.set_tab_width(4).unwrap();
        let rect = metrics.tab_stop_rect(Point::new(10.0, 3.0), 6.0);
        assert_eq!(rect.max_x(), 24.0);
        assert_eq!(rect.origin, Point::new(10.0, 3.0));
    }

    #[test]
    fn tab_just_before_a_stop_jumps_to_the_next() {
        let mut metrics = LayoutMetrics::default();
        metrics.set_tab_width(4).unwrap();
        assert_eq!(metrics.tab_stop_rect(Point::new(21.0, 0.0), 6.0).max_x(), 48.0);
        assert_eq!(metrics.tab_stop_rect(Point::new(0.0, 0.0), 6.0).max_x(), 24.0);
    }

    #[test]
    fn tab_stop_for_font_measures_n() {
        let metrics = LayoutMetrics::default();
        let font = Font::new("Menlo", 10.0);
        let rect = metrics.tab_stop_rect_for_font(Point::ZERO, &Monospace, &font);
        assert!((rect.size.width - 12.0).abs() < 1e-4);
    }

    #[test]
    fn tab_is_whitespace() {
        let cache = cache("a\tb");
        let metrics = LayoutMetrics::default();
        assert_eq!(
            metrics
                .control_character_action(&cache, 1, ControlCharacterAction::ZeroAdvancement)
                .unwrap(),
            ControlCharacterAction::Whitespace
        );
        assert_eq!(
            metrics
                .control_character_action(&cache, 0, ControlCharacterAction::ZeroAdvancement)
                .unwrap(),
            ControlCharacterAction::ZeroAdvancement
        );
    }

    // -- Line spacing -------------------------------------------------------

    #[test]
    fn line_spacing_adds_only_the_extra() {
        let mut metrics = LayoutMetrics::default();
        assert_eq!(metrics.line_spacing_extra(10.0), 0.0);
        metrics.set_line_height_multiplier(1.5).unwrap();
        assert_eq!(metrics.line_spacing_extra(10.0), 5.0);
        metrics.set_line_height_multiplier(0.5).unwrap();
        assert_eq!(metrics.line_spacing_extra(10.0), 0.0);
    }

    // -- Invalidation -------------------------------------------------------

    #[test]
    fn setters_invalidate_only_on_change() {
        let mut metrics = LayoutMetrics::default();
        assert_eq!(metrics.set_gutter_enabled(false), Invalidation::Nothing);
        assert_eq!(metrics.set_gutter_enabled(true), Invalidation::All);
        assert_eq!(metrics.set_tab_width(2), Ok(Invalidation::Nothing));
        assert_eq!(metrics.set_tab_width(8), Ok(Invalidation::All));
        assert_eq!(metrics.set_gutter_width(20.0), Ok(Invalidation::All));
        assert_eq!(Invalidation::All.range(12), Some(CharRange::new(0, 12)));
        assert_eq!(Invalidation::Nothing.range(12), None);
    }

    #[test]
    fn invalid_values_leave_config_alone() {
        let mut metrics = LayoutMetrics::default();
        assert!(metrics.set_tab_width(0).is_err());
        assert!(metrics.set_line_height_multiplier(-1.0).is_err());
        assert!(metrics.set_line_height_multiplier(f32::NAN).is_err());
        assert!(metrics.set_gutter_width(-2.0).is_err());
        assert_eq!(metrics.config(), &LayoutConfig::default());
    }
}
