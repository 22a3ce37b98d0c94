//! Run-length attribute storage.
//!
//! A `RunList` is the attribute shadow of a buffer: one [`Attributes`] per
//! char, stored as runs of equal attributes. The list is kept normalized
//! after every call (no zero-length runs, no two neighbours with equal
//! attributes), so two lists describing the same per-char attributes
//! compare equal.
//!
//! Each run records its start offset, so finding the run under an index is
//! a binary search. Recoloring never moves a start; only `replace` shifts
//! the starts after the edit, the same way the paragraph index does.
//! Every operation splits runs at the range boundaries, rewrites the runs in
//! between, and merges only around the touched window.

use crate::error::{Result, TextError};
use crate::range::CharRange;
use crate::style::{Attributes, Color};

/// `start` is the sum of the lengths of every run before this one.
#[derive(Debug, Clone, PartialEq)]
struct Run {
    start: usize,
    len: usize,
    attrs: Attributes,
}

impl Run {
    const fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A range of chars sharing one set of attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedRun {
    pub range: CharRange,
    pub attributes: Attributes,
}

/// Normalized run-length list of attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunList {
    runs: Vec<Run>,
    len: usize,
}

impl RunList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runs: Vec::new(),
            len: 0,
        }
    }

    /// `len` chars, all carrying `attrs`.
    #[must_use]
    pub fn uniform(len: usize, attrs: Attributes) -> Self {
        let runs = if len == 0 {
            Vec::new()
        } else {
            vec![Run {
                start: 0,
                len,
                attrs,
            }]
        };
        Self { runs, len }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored runs.
    #[inline]
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    // -- Mutation -----------------------------------------------------------

    /// Replace the chars in `range` with `new_len` chars carrying no
    /// attributes. Mirrors a text replace so the list keeps the buffer's
    /// length.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn replace(&mut self, range: CharRange, new_len: usize) -> Result<()> {
        self.check(range)?;
        let (i, j) = self.split_range(range);
        self.runs.drain(i..j);
        for run in &mut self.runs[i..] {
            run.start = run.start - range.len() + new_len;
        }
        if new_len > 0 {
            self.runs.insert(
                i,
                Run {
                    start: range.start,
                    len: new_len,
                    attrs: Attributes::none(),
                },
            );
        }
        self.len = self.len - range.len() + new_len;
        self.coalesce(i, i + 2);
        Ok(())
    }

    /// Clear `range` and give every char in it exactly `attrs`.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn set(&mut self, range: CharRange, attrs: Attributes) -> Result<()> {
        self.check(range)?;
        if range.is_empty() {
            return Ok(());
        }
        let (i, j) = self.split_range(range);
        self.runs.splice(
            i..j,
            [Run {
                start: range.start,
                len: range.len(),
                attrs,
            }],
        );
        self.coalesce(i, i + 2);
        Ok(())
    }

    /// Set the color over `range`, keeping each char's font.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn add_color(&mut self, range: CharRange, color: Color) -> Result<()> {
        self.check(range)?;
        if range.is_empty() {
            return Ok(());
        }
        let (i, j) = self.split_range(range);
        for run in &mut self.runs[i..j] {
            run.attrs.color = Some(color);
        }
        self.coalesce(i, j + 1);
        Ok(())
    }

    // -- Queries ------------------------------------------------------------

    /// The attributes at `index` and the full extent of the run holding it.
    #[must_use]
    pub fn attributes_at(&self, index: usize) -> Option<(Attributes, CharRange)> {
        let run = &self.runs[self.run_index(index)?];
        Some((run.attrs.clone(), CharRange::with_len(run.start, run.len)))
    }

    /// The runs overlapping `range`, clipped to it.
    #[must_use]
    pub fn runs_in(&self, range: CharRange) -> Vec<AttributedRun> {
        let first = self.runs.partition_point(|r| r.end() <= range.start);
        self.runs[first..]
            .iter()
            .take_while(|r| r.start < range.end)
            .filter_map(|r| {
                CharRange::with_len(r.start, r.len)
                    .intersection(range)
                    .map(|clipped| AttributedRun {
                        range: clipped,
                        attributes: r.attrs.clone(),
                    })
            })
            .collect()
    }

    /// Every run, in order.
    #[must_use]
    pub fn all_runs(&self) -> Vec<AttributedRun> {
        self.runs_in(CharRange::new(0, self.len))
    }

    // -- Helpers ------------------------------------------------------------

    fn check(&self, range: CharRange) -> Result<()> {
        if range.start > range.end || range.end > self.len {
            return Err(TextError::OutOfBounds {
                range,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Index of the run holding char `index`.
    fn run_index(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.runs.partition_point(|r| r.start <= index).checked_sub(1)
    }

    /// Split at both ends of `range`; returns the run index span covering it.
    fn split_range(&mut self, range: CharRange) -> (usize, usize) {
        let i = self.split_at(range.start);
        let j = self.split_at(range.end);
        (i, j)
    }

    /// Make sure a run boundary sits at `index` and return the index of the
    /// first run starting there (or `runs.len()` at the end).
    fn split_at(&mut self, index: usize) -> usize {
        let Some(i) = self.run_index(index) else {
            return self.runs.len();
        };
        let run = &mut self.runs[i];
        if run.start == index {
            return i;
        }
        let head = index - run.start;
        let tail = Run {
            start: index,
            len: run.len - head,
            attrs: run.attrs.clone(),
        };
        run.len = head;
        self.runs.insert(i + 1, tail);
        i + 1
    }

    /// Merge equal neighbours among runs `lo - 1 .. hi`.
    fn coalesce(&mut self, lo: usize, hi: usize) {
        let mut k = lo.max(1);
        let mut hi = hi.min(self.runs.len());
        while k < hi {
            if self.runs[k - 1].attrs == self.runs[k].attrs {
                let merged = self.runs.remove(k);
                self.runs[k - 1].len += merged.len;
                hi -= 1;
            } else {
                k += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
