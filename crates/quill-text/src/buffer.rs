//! Text buffer: the single source of truth for text content.
//!
//! A `TextBuffer` wraps a [`ropey::Rope`] together with a [`ParagraphIndex`]
//! that is updated on every replace. It has no listeners: the owning
//! [`AttributedCache`](crate::storage::AttributedCache) wraps every mutation
//! and tells the outside world what changed.
//!
//! # Design choices
//!
//! - **ropey** gives O(log n) splicing at any index and zero-copy slices.
//!   Indices are char offsets, never bytes.
//!
//! - **One mutation entry point.** [`replace`](TextBuffer::replace) covers
//!   insert (empty range) and delete (empty text). It validates the range
//!   before touching anything and reports the change in length, so no caller
//!   can observe a length that disagrees with the content.
//!
//! - **Paragraph queries are index lookups.** `paragraph_range` and
//!   `paragraph_ordinal` binary-search the paragraph index instead of
//!   scanning from the start of the buffer.

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::error::{Result, TextError};
use crate::paragraph::ParagraphIndex;
use crate::range::CharRange;

// ---------------------------------------------------------------------------
// TextEdit
// ---------------------------------------------------------------------------

/// What a single [`TextBuffer::replace`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    /// The replaced range, in pre-edit coordinates.
    pub range: CharRange,
    /// Number of chars inserted in its place.
    pub inserted: usize,
}

impl TextEdit {
    /// Where the inserted text sits after the edit.
    #[inline]
    #[must_use]
    pub const fn new_range(&self) -> CharRange {
        CharRange::with_len(self.range.start, self.inserted)
    }

    /// `inserted - removed`, signed.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn change_in_length(&self) -> isize {
        self.inserted as isize - self.range.len() as isize
    }
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// A mutable text buffer backed by a rope, with paragraph queries.
pub struct TextBuffer {
    rope: Rope,
    paragraphs: ParagraphIndex,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            paragraphs: ParagraphIndex::new(),
        }
    }

    /// Create a buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let paragraphs = ParagraphIndex::from_rope(&rope);
        Self { rope, paragraphs }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope, for callers that want direct rope operations.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Current character count.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The char at `index`.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `index >= len()`.
    pub fn char_at(&self, index: usize) -> Result<char> {
        if index >= self.len() {
            return Err(self.out_of_bounds(CharRange::with_len(index, 1)));
        }
        Ok(self.rope.char(index))
    }

    /// Zero-copy view of the chars in `range`.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn slice(&self, range: CharRange) -> Result<RopeSlice<'_>> {
        self.check_range(range)?;
        Ok(self.rope.slice(range.as_std()))
    }

    /// The chars in `range`, collected into a `String`.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn chars_in(&self, range: CharRange) -> Result<String> {
        self.slice(range).map(|s| s.to_string())
    }

    /// All text as a `String`. Allocates; prefer [`slice`](Self::slice).
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Editing ------------------------------------------------------------

    /// Replace `range` with `text`.
    ///
    /// Afterwards `len() == old_len - range.len() + text.chars().count()`.
    /// The rope and the paragraph index are updated together before this
    /// returns; nothing in between is observable.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`. The buffer is
    /// left untouched.
    pub fn replace(&mut self, range: CharRange, text: &str) -> Result<TextEdit> {
        self.check_range(range)?;
        let inserted = text.chars().count();

        if !range.is_empty() {
            self.rope.remove(range.as_std());
        }
        if inserted > 0 {
            self.rope.insert(range.start, text);
        }
        self.paragraphs
            .apply_edit(&self.rope, range.start, range.len(), inserted);

        Ok(TextEdit { range, inserted })
    }

    // -- Paragraphs ---------------------------------------------------------

    /// The smallest paragraph-aligned range covering `range`.
    ///
    /// Expands backward to the start of the paragraph containing
    /// `range.start` and forward past the terminator of the paragraph
    /// containing the last char of `range` (or `range.start` when the range
    /// is empty).
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn paragraph_range(&self, range: CharRange) -> Result<CharRange> {
        self.check_range(range)?;
        let last = if range.is_empty() {
            range.start
        } else {
            range.end - 1
        };
        Ok(CharRange::new(
            self.paragraphs.start_of(range.start),
            self.paragraphs.end_of(last, self.len()),
        ))
    }

    /// True when `range` starts and ends on paragraph boundaries.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn is_paragraph_aligned(&self, range: CharRange) -> Result<bool> {
        Ok(self.paragraph_range(range)? == range)
    }

    /// 1-based number of the paragraph containing `index`. An index equal to
    /// `len()` belongs to the last paragraph.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `index > len()`.
    pub fn paragraph_ordinal(&self, index: usize) -> Result<usize> {
        self.check_range(CharRange::point(index))?;
        Ok(self.paragraphs.ordinal_at(index))
    }

    /// Number of paragraphs, counting an empty trailing one.
    #[inline]
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.count()
    }

    /// The paragraph index itself.
    #[inline]
    #[must_use]
    pub const fn paragraph_index(&self) -> &ParagraphIndex {
        &self.paragraphs
    }

    /// Iterate the whole paragraphs inside `range`. Yields nothing for an
    /// empty range. `range` is expected to be paragraph-aligned; a range
    /// that ends mid-paragraph has its last item clipped to `range.end`.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn paragraph_ranges(&self, range: CharRange) -> Result<Paragraphs<'_>> {
        self.check_range(range)?;
        Ok(Paragraphs {
            buffer: self,
            next: range.start,
            end: range.end,
        })
    }

    // -- Helpers ------------------------------------------------------------

    fn check_range(&self, range: CharRange) -> Result<()> {
        if range.end > self.len() || range.start > range.end {
            return Err(self.out_of_bounds(range));
        }
        Ok(())
    }

    fn out_of_bounds(&self, range: CharRange) -> TextError {
        TextError::OutOfBounds {
            range,
            len: self.len(),
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("chars", &self.len())
            .field("paragraphs", &self.paragraph_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Paragraph iterator
// ---------------------------------------------------------------------------

/// Iterator over consecutive paragraph ranges. See
/// [`TextBuffer::paragraph_ranges`].
#[derive(Debug, Clone)]
pub struct Paragraphs<'a> {
    buffer: &'a TextBuffer,
    next: usize,
    end: usize,
}

impl Iterator for Paragraphs<'_> {
    type Item = CharRange;

    fn next(&mut self) -> Option<CharRange> {
        if self.next >= self.end {
            return None;
        }
        let start = self.next;
        let para_end = self
            .buffer
            .paragraphs
            .end_of(start, self.buffer.len())
            .min(self.end);
        self.next = para_end;
        Some(CharRange::new(start, para_end))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.paragraph_count(), 1);
    }

    #[test]
    fn from_text_counts_chars_not_bytes() {
        let buf = TextBuffer::from_text("café\n");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.char_at(3), Ok('é'));
    }

    // -- Access -------------------------------------------------------------

    #[test]
    fn char_at_out_of_bounds() {
        let buf = TextBuffer::from_text("hi");
        assert_eq!(
            buf.char_at(2),
            Err(TextError::OutOfBounds {
                range: CharRange::new(2, 3),
                len: 2
            })
        );
    }

    #[test]
    fn chars_in_range() {
        let buf = TextBuffer::from_text("int x = 1;\n");
        assert_eq!(buf.chars_in(CharRange::new(4, 5)).unwrap(), "x");
        assert_eq!(buf.chars_in(CharRange::point(3)).unwrap(), "");
        assert!(buf.chars_in(CharRange::new(4, 20)).is_err());
    }

    // -- Replace ------------------------------------------------------------

    #[test]
    fn replace_reports_change_in_length() {
        let mut buf = TextBuffer::from_text("int x = 1;\n");
        let edit = buf.replace(CharRange::new(4, 5), "xyz").unwrap();
        assert_eq!(buf.contents(), "int xyz = 1;\n");
        assert_eq!(buf.len(), 13);
        assert_eq!(edit.change_in_length(), 2);
        assert_eq!(edit.new_range(), CharRange::new(4, 7));
    }

    #[test]
    fn replace_as_insert_and_delete() {
        let mut buf = TextBuffer::from_text("hllo");
        buf.replace(CharRange::point(1), "e").unwrap();
        assert_eq!(buf.contents(), "hello");

        let edit = buf.replace(CharRange::new(1, 4), "").unwrap();
        assert_eq!(buf.contents(), "ho");
        assert_eq!(edit.change_in_length(), -3);
    }

    #[test]
    fn replace_out_of_bounds_leaves_buffer_alone() {
        let mut buf = TextBuffer::from_text("abc");
        let err = buf.replace(CharRange::new(2, 9), "zz").unwrap_err();
        assert!(matches!(err, TextError::OutOfBounds { len: 3, .. }));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn replace_updates_paragraphs() {
        let mut buf = TextBuffer::from_text("a\nb\nc\n");
        buf.replace(CharRange::new(1, 2), "").unwrap();
        assert_eq!(buf.contents(), "ab\nc\n");
        assert_eq!(buf.paragraph_count(), 3);
        assert_eq!(buf.paragraph_ordinal(3).unwrap(), 2);
    }

    // -- Paragraph range ----------------------------------------------------

    #[test]
    fn paragraph_range_for_point() {
        let buf = TextBuffer::from_text("// hello\nint y;\n");
        assert_eq!(buf.paragraph_range(CharRange::point(0)).unwrap(), CharRange::new(0, 9));
        assert_eq!(buf.paragraph_range(CharRange::point(8)).unwrap(), CharRange::new(0, 9));
        assert_eq!(buf.paragraph_range(CharRange::point(9)).unwrap(), CharRange::new(9, 16));
        assert_eq!(buf.paragraph_range(CharRange::point(16)).unwrap(), CharRange::point(16));
    }

    #[test]
    fn paragraph_range_spanning_paragraphs() {
        let buf = TextBuffer::from_text("aa\nbb\ncc");
        assert_eq!(buf.paragraph_range(CharRange::new(1, 4)).unwrap(), CharRange::new(0, 6));
        assert_eq!(buf.paragraph_range(CharRange::new(7, 8)).unwrap(), CharRange::new(6, 8));
    }

    #[test]
    fn paragraph_range_ending_on_terminator_stays_in_paragraph() {
        let buf = TextBuffer::from_text("aa\nbb\n");
        assert_eq!(buf.paragraph_range(CharRange::new(0, 3)).unwrap(), CharRange::new(0, 3));
    }

    #[test]
    fn paragraph_range_is_idempotent() {
        let buf = TextBuffer::from_text("x\r\ny\n\nz");
        for start in 0..=buf.len() {
            for end in start..=buf.len() {
                let once = buf.paragraph_range(CharRange::new(start, end)).unwrap();
                assert_eq!(buf.paragraph_range(once).unwrap(), once);
                assert!(once.covers(CharRange::new(start, end)));
            }
        }
    }

    #[test]
    fn paragraph_range_out_of_bounds() {
        let buf = TextBuffer::from_text("ab");
        assert!(buf.paragraph_range(CharRange::point(3)).is_err());
    }

    // -- Ordinals -----------------------------------------------------------

    #[test]
    fn ordinal_first_and_third() {
        let buf = TextBuffer::from_text("one\ntwo\nthree\n");
        assert_eq!(buf.paragraph_ordinal(0).unwrap(), 1);
        assert_eq!(buf.paragraph_ordinal(9).unwrap(), 3);
        assert_eq!(buf.paragraph_ordinal(14).unwrap(), 4);
        assert!(buf.paragraph_ordinal(15).is_err());
    }

    // -- Paragraph iteration ------------------------------------------------

    #[test]
    fn paragraph_ranges_tile_input() {
        let buf = TextBuffer::from_text("a\n\nbc\r\nd");
        let paras: Vec<_> = buf
            .paragraph_ranges(CharRange::new(0, buf.len()))
            .unwrap()
            .collect();
        assert_eq!(
            paras,
            vec![
                CharRange::new(0, 2),
                CharRange::new(2, 3),
                CharRange::new(3, 7),
                CharRange::new(7, 8),
            ]
        );
    }

    #[test]
    fn paragraph_ranges_empty() {
        let buf = TextBuffer::from_text("ab\n");
        assert_eq!(buf.paragraph_ranges(CharRange::point(3)).unwrap().count(), 0);
    }

    // -- Debug format -------------------------------------------------------

    #[test]
    fn debug_format() {
        let buf = TextBuffer::from_text("a\nb\n");
        let debug = format!("{buf:?}");
        assert!(debug.contains("chars: 4"));
        assert!(debug.contains("paragraphs: 3"));
    }
}
