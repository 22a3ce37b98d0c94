//! Char-index range type.
//!
//! All indices in quill are **char indices**: offsets counted in Unicode
//! scalar values, which is how `ropey` indexes text. Byte offsets never leak
//! into the public API.

use std::fmt;

/// A half-open range of char indices: `[start, end)`.
///
/// `start` is inclusive, `end` is exclusive. An empty range has
/// `start == end` and marks a position between two chars (an insertion
/// point). Ranges are always normalized so that `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharRange {
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    /// Create a range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "CharRange::new requires start <= end");
        Self { start, end }
    }

    /// A zero-width range at `index`.
    #[inline]
    #[must_use]
    pub const fn point(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// A range starting at `start` spanning `len` chars.
    #[inline]
    #[must_use]
    pub const fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True when the range covers no chars.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `index` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// True when `other` lies entirely inside this range.
    #[inline]
    #[must_use]
    pub const fn covers(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// The smallest range containing both ranges.
    #[inline]
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The overlap of two ranges, or `None` when they share no chars.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Self { start, end })
    }

    /// Convert to a std range for slicing.
    #[inline]
    #[must_use]
    pub const fn as_std(self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<std::ops::Range<usize>> for CharRange {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Debug for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharRange({}..{})", self.start, self.end)
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
