//! Paragraph start index.
//!
//! A paragraph is a maximal run of text ended by a terminator, and it owns
//! that terminator. The index keeps the char offset of every paragraph start
//! in ascending order, so "which paragraph is index `i` in" is a binary
//! search instead of a scan from the top of the buffer.
//!
//! # Terminators
//!
//! `\n`, `\r`, `\r\n` (one terminator, two chars), U+0085 NEXT LINE and
//! U+2029 PARAGRAPH SEPARATOR. A buffer whose last char is a terminator has
//! an empty trailing paragraph starting at `len`; that is the line an editor
//! shows the caret on after a final newline, and it gets its own number.
//!
//! # Incremental updates
//!
//! Whether offset `s` starts a paragraph depends only on the chars at `s - 1`
//! and `s` (the second one matters for `\r` followed by `\n`). After a
//! replace of `[start, old_end)` with `inserted` chars, every start below
//! `start` is untouched, every start above `old_end` just shifts by the change
//! in length, and only offsets in `[start, start + inserted]` need a fresh
//! look. That window is as long as the inserted text, no matter how large
//! the buffer is.

use ropey::Rope;

/// True for chars that end a paragraph.
#[inline]
#[must_use]
pub const fn is_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{0085}' | '\u{2029}')
}

/// True for horizontal blanks: tab and the space separators. Line and
/// paragraph separators, terminators and other controls are not blank.
#[inline]
#[must_use]
pub fn is_blank(ch: char) -> bool {
    ch == '\t' || (ch.is_whitespace() && !ch.is_control() && !matches!(ch, '\u{2028}' | '\u{2029}'))
}

/// Sorted list of paragraph start offsets. `starts[0]` is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphIndex {
    starts: Vec<usize>,
}

impl ParagraphIndex {
    /// An index for an empty buffer: a single empty paragraph at 0.
    #[must_use]
    pub fn new() -> Self {
        Self { starts: vec![0] }
    }

    /// Build an index by scanning the whole rope.
    #[must_use]
    pub fn from_rope(rope: &Rope) -> Self {
        let mut index = Self::new();
        index.rebuild(rope);
        index
    }

    /// Rescan the whole rope. O(n), for bulk loads only.
    pub fn rebuild(&mut self, rope: &Rope) {
        self.starts.clear();
        self.starts.push(0);

        let mut chars = rope.chars().peekable();
        let mut offset = 0;
        while let Some(ch) = chars.next() {
            offset += 1;
            // `\r\n` ends at the `\n`.
            if ch == '\r' && chars.peek() == Some(&'\n') {
                continue;
            }
            if is_terminator(ch) {
                self.starts.push(offset);
            }
        }
    }

    /// Update the index after `removed` chars at `start` were replaced by
    /// `inserted` chars. `rope` is the text *after* the replace.
    pub fn apply_edit(&mut self, rope: &Rope, start: usize, removed: usize, inserted: usize) {
        let old_end = start + removed;
        let new_end = start + inserted;

        // Entry 0 is permanent, so the rescan window never reaches below 1.
        let lo = self.starts.partition_point(|&s| s < start.max(1));
        let hi = self.starts.partition_point(|&s| s <= old_end).max(lo);

        for s in &mut self.starts[hi..] {
            *s = *s - removed + inserted;
        }

        let window = (start.max(1)..=new_end).filter(|&s| starts_paragraph(rope, s));
        self.starts.splice(lo..hi, window);
    }

    /// Number of paragraphs, including an empty trailing one.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.starts.len()
    }

    /// All paragraph start offsets, ascending.
    #[inline]
    #[must_use]
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// 1-based number of the paragraph containing `index`.
    #[inline]
    #[must_use]
    pub fn ordinal_at(&self, index: usize) -> usize {
        self.starts.partition_point(|&s| s <= index)
    }

    /// Start offset of the paragraph containing `index`.
    #[inline]
    #[must_use]
    pub fn start_of(&self, index: usize) -> usize {
        self.starts[self.ordinal_at(index) - 1]
    }

    /// End offset (exclusive, past the terminator) of the paragraph
    /// containing `index`. `len` is the buffer length.
    #[inline]
    #[must_use]
    pub fn end_of(&self, index: usize, len: usize) -> usize {
        self.starts.get(self.ordinal_at(index)).copied().unwrap_or(len)
    }
}

impl Default for ParagraphIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// True when offset `s` (1..=len) is the first char of a paragraph.
fn starts_paragraph(rope: &Rope, s: usize) -> bool {
    let len = rope.len_chars();
    if s == 0 || s > len {
        return false;
    }
    match rope.char(s - 1) {
        '\r' => s == len || rope.char(s) != '\n',
        ch => is_terminator(ch),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
