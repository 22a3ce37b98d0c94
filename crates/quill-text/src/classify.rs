//! Semantic classification: which parts of a paragraph are keywords,
//! comments, or plain text.
//!
//! The classifier works one paragraph at a time and never looks across a
//! paragraph boundary, which is what lets the cache re-classify only the
//! paragraphs an edit touched.
//!
//! # Rules
//!
//! For each paragraph, in order:
//!
//! 1. If the paragraph, with leading blanks (spaces, tabs) trimmed,
//!    starts with `//`, the whole paragraph is one `Comment` span.
//! 2. If the paragraph starts with `#` (no trimming), the whole paragraph is
//!    one `Comment` span.
//! 3. Otherwise it is split into whitespace-delimited words. A word that is
//!    in the [`KeywordSet`] becomes a `Keyword` span; everything else,
//!    whitespace and terminator included, is `Text`. Neighbouring `Text`
//!    spans are merged, so `"int x = 1;\n"` yields exactly
//!    `Keyword(0..3)` and `Text(3..11)`.
//!
//! The spans for a range always tile it: no gaps, no overlaps, in order.
//! `Pragma` exists for the color mapping but no rule produces it yet.

use std::collections::HashSet;
use std::vec;

use log::trace;

use crate::buffer::{Paragraphs, TextBuffer};
use crate::error::{ContractViolation, Result};
use crate::paragraph::is_blank;
use crate::range::CharRange;

// ---------------------------------------------------------------------------
// Kinds and spans
// ---------------------------------------------------------------------------

/// Classification label for a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticKind {
    Text,
    Comment,
    /// Reserved. Has a color, never emitted.
    Pragma,
    Keyword,
}

/// A classified range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub range: CharRange,
    pub kind: SemanticKind,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize, kind: SemanticKind) -> Self {
        Self {
            range: CharRange::new(start, end),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// KeywordSet
// ---------------------------------------------------------------------------

/// The words the classifier marks as keywords. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<Box<str>>,
}

impl KeywordSet {
    /// `int`, `const`, `char`, `return`.
    #[must_use]
    pub fn c_like() -> Self {
        Self::from_words(["int", "const", "char", "return"])
    }

    /// A set holding exactly `words`.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().into()).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::c_like()
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Paragraph-granular classifier over a [`KeywordSet`].
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: KeywordSet,
}

impl Classifier {
    #[must_use]
    pub const fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// Classify the paragraphs in `range`. The returned iterator does the
    /// work lazily, one paragraph per refill.
    ///
    /// # Errors
    ///
    /// - [`TextError::OutOfBounds`](crate::TextError::OutOfBounds) when
    ///   `range` reaches past the buffer.
    /// - [`ContractViolation::UnalignedRange`] when `range` is not whole
    ///   paragraphs.
    pub fn classify<'a>(&'a self, buffer: &'a TextBuffer, range: CharRange) -> Result<Spans<'a>> {
        let expected = buffer.paragraph_range(range)?;
        if expected != range {
            return Err(ContractViolation::UnalignedRange { range, expected }.into());
        }
        Ok(Spans {
            buffer,
            keywords: &self.keywords,
            paragraphs: buffer.paragraph_ranges(range)?,
            pending: Vec::new().into_iter(),
        })
    }

    /// Classify one paragraph's chars. `start` is the paragraph's offset in
    /// the buffer.
    fn classify_paragraph(keywords: &KeywordSet, start: usize, chars: &[char]) -> Vec<Span> {
        let end = start + chars.len();
        if chars.is_empty() {
            return Vec::new();
        }
        if is_comment(chars) {
            return vec![Span::new(start, end, SemanticKind::Comment)];
        }

        let words = words(chars);
        if words.is_empty() {
            return vec![Span::new(start, end, SemanticKind::Text)];
        }

        let mut out = SpanBuilder::default();
        let mut word_text = String::new();
        for (i, &(ws, we)) in words.iter().enumerate() {
            let enclosing_start = if i == 0 { 0 } else { ws };
            let enclosing_end = words.get(i + 1).map_or(chars.len(), |&(next, _)| next);

            word_text.clear();
            word_text.extend(&chars[ws..we]);

            if keywords.contains(&word_text) {
                out.push(start + enclosing_start, start + ws, SemanticKind::Text);
                out.push(start + ws, start + we, SemanticKind::Keyword);
                out.push(start + we, start + enclosing_end, SemanticKind::Text);
            } else {
                out.push(
                    start + enclosing_start,
                    start + enclosing_end,
                    SemanticKind::Text,
                );
            }
        }
        out.spans
    }
}

/// `//` after leading blanks, or `#` in the very first column.
fn is_comment(chars: &[char]) -> bool {
    let first = chars.iter().position(|&c| !is_blank(c));
    let slashes = first.is_some_and(|i| chars[i..].starts_with(&['/', '/']));
    slashes || chars.first() == Some(&'#')
}

/// `(start, end)` of every maximal non-whitespace run.
fn words(chars: &[char]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut current: Option<usize> = None;
    for (i, ch) in chars.iter().enumerate() {
        match (ch.is_whitespace(), current) {
            (false, None) => current = Some(i),
            (true, Some(s)) => {
                out.push((s, i));
                current = None;
            }
            _ => {}
        }
    }
    if let Some(s) = current {
        out.push((s, chars.len()));
    }
    out
}

/// Collects spans, dropping empty ones and merging adjacent `Text`.
#[derive(Default)]
struct SpanBuilder {
    spans: Vec<Span>,
}

impl SpanBuilder {
    fn push(&mut self, start: usize, end: usize, kind: SemanticKind) {
        if start == end {
            return;
        }
        match self.spans.last_mut() {
            Some(last)
                if kind == SemanticKind::Text
                    && last.kind == SemanticKind::Text
                    && last.range.end == start =>
            {
                last.range.end = end;
            }
            _ => self.spans.push(Span::new(start, end, kind)),
        }
    }
}

// ---------------------------------------------------------------------------
// Lazy span iterator
// ---------------------------------------------------------------------------

/// Spans for a paragraph-aligned range, produced a paragraph at a time.
/// Returned by [`Classifier::classify`].
#[derive(Debug, Clone)]
pub struct Spans<'a> {
    buffer: &'a TextBuffer,
    keywords: &'a KeywordSet,
    paragraphs: Paragraphs<'a>,
    pending: vec::IntoIter<Span>,
}

impl Iterator for Spans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            if let Some(span) = self.pending.next() {
                return Some(span);
            }
            let para = self.paragraphs.next()?;
            let chars: Vec<char> = self.buffer.rope().slice(para.as_std()).chars().collect();
            let spans = Classifier::classify_paragraph(self.keywords, para.start, &chars);
            trace!("classified paragraph {para} into {} spans", spans.len());
            self.pending = spans.into_iter();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TextError;
    use pretty_assertions::assert_eq;

    use SemanticKind::{Comment, Keyword, Text};

    fn classify_all(text: &str) -> Vec<Span> {
        let buf = TextBuffer::from_text(text);
        Classifier::default()
            .classify(&buf, CharRange::new(0, buf.len()))
            .unwrap()
            .collect()
    }

    fn assert_tiles(spans: &[Span], range: CharRange) {
        if range.is_empty() {
            assert!(spans.is_empty());
            return;
        }
        assert_eq!(spans.first().map(|s| s.range.start), Some(range.start));
        assert_eq!(spans.last().map(|s| s.range.end), Some(range.end));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
    }

    // -- Scenarios ----------------------------------------------------------

    #[test]
    fn keyword_then_text() {
        assert_eq!(
            classify_all("int x = 1;\n"),
            vec![Span::new(0, 3, Keyword), Span::new(3, 11, Text)]
        );
    }

    #[test]
    fn slash_comment_then_code() {
        assert_eq!(
            classify_all("// hello\nint y;\n"),
            vec![
                Span::new(0, 9, Comment),
                Span::new(9, 12, Keyword),
                Span::new(12, 16, Text),
            ]
        );
    }

    #[test]
    fn hash_line_is_comment() {
        assert_eq!(
            classify_all("#define X 1\n"),
            vec![Span::new(0, 12, Comment)]
        );
    }

    // -- Comment detection --------------------------------------------------

    #[test]
    fn indented_slash_comment() {
        assert_eq!(
            classify_all("    // note\n"),
            vec![Span::new(0, 12, Comment)]
        );
    }

    #[test]
    fn tab_indented_slash_comment() {
        assert_eq!(classify_all(" \t// x\n"), vec![Span::new(0, 7, Comment)]);
    }

    #[test]
    fn line_separator_before_slashes_is_not_trimmed() {
        assert_eq!(classify_all("\u{2028}// x"), vec![Span::new(0, 5, Text)]);
    }

    #[test]
    fn indented_hash_is_not_comment() {
        let spans = classify_all("  #include\n");
        assert_eq!(spans, vec![Span::new(0, 11, Text)]);
    }

    #[test]
    fn single_slash_is_text() {
        assert_eq!(classify_all("/ x\n"), vec![Span::new(0, 4, Text)]);
    }

    // -- Keywords -----------------------------------------------------------

    #[test]
    fn keyword_match_is_case_sensitive() {
        assert_eq!(classify_all("Int x\n"), vec![Span::new(0, 6, Text)]);
    }

    #[test]
    fn keyword_must_be_whole_word() {
        assert_eq!(classify_all("int;\n"), vec![Span::new(0, 5, Text)]);
        assert_eq!(classify_all("integer\n"), vec![Span::new(0, 8, Text)]);
    }

    #[test]
    fn keywords_in_middle_of_line() {
        assert_eq!(
            classify_all("  return const\n"),
            vec![
                Span::new(0, 2, Text),
                Span::new(2, 8, Keyword),
                Span::new(8, 9, Text),
                Span::new(9, 14, Keyword),
                Span::new(14, 15, Text),
            ]
        );
    }

    #[test]
    fn keyword_at_buffer_end_without_terminator() {
        assert_eq!(
            classify_all("x char"),
            vec![Span::new(0, 2, Text), Span::new(2, 6, Keyword)]
        );
    }

    #[test]
    fn custom_keyword_set() {
        let buf = TextBuffer::from_text("fn main\n");
        let classifier = Classifier::new(KeywordSet::from_words(["fn"]));
        let spans: Vec<_> = classifier
            .classify(&buf, CharRange::new(0, 8))
            .unwrap()
            .collect();
        assert_eq!(spans, vec![Span::new(0, 2, Keyword), Span::new(2, 8, Text)]);
    }

    // -- Blank paragraphs ---------------------------------------------------

    #[test]
    fn blank_lines_are_single_text_spans() {
        assert_eq!(
            classify_all("\n   \n"),
            vec![Span::new(0, 1, Text), Span::new(1, 5, Text)]
        );
    }

    #[test]
    fn empty_buffer_has_no_spans() {
        assert_eq!(classify_all(""), vec![]);
    }

    #[test]
    fn no_merging_across_paragraphs() {
        let spans = classify_all("a\nb\n");
        assert_eq!(spans, vec![Span::new(0, 2, Text), Span::new(2, 4, Text)]);
    }

    // -- Tiling -------------------------------------------------------------

    #[test]
    fn spans_tile_mixed_input() {
        let text = "int main() {\n\t// c\r\n#x\n  return 0;\u{2029}}";
        let spans = classify_all(text);
        assert_tiles(&spans, CharRange::new(0, text.chars().count()));
    }

    #[test]
    fn sub_range_of_paragraphs() {
        let buf = TextBuffer::from_text("a\nint b\nc\n");
        let spans: Vec<_> = Classifier::default()
            .classify(&buf, CharRange::new(2, 8))
            .unwrap()
            .collect();
        assert_eq!(spans, vec![Span::new(2, 5, Keyword), Span::new(5, 8, Text)]);
    }

    // -- Contract -----------------------------------------------------------

    #[test]
    fn unaligned_range_is_rejected() {
        let buf = TextBuffer::from_text("int x;\nint y;\n");
        let err = Classifier::default()
            .classify(&buf, CharRange::new(1, 7))
            .unwrap_err();
        assert_eq!(
            err,
            TextError::Contract(ContractViolation::UnalignedRange {
                range: CharRange::new(1, 7),
                expected: CharRange::new(0, 7),
            })
        );
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let buf = TextBuffer::from_text("ab");
        assert!(matches!(
            Classifier::default().classify(&buf, CharRange::new(0, 5)),
            Err(TextError::OutOfBounds { .. })
        ));
    }

    // -- KeywordSet ---------------------------------------------------------

    #[test]
    fn c_like_keywords() {
        let set = KeywordSet::c_like();
        assert_eq!(set.len(), 4);
        for word in ["int", "const", "char", "return"] {
            assert!(set.contains(word));
        }
        assert!(!set.contains("void"));
    }
}
