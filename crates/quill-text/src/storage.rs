//! Attributed storage: a text buffer plus its attribute shadow, kept in
//! lock-step.
//!
//! [`AttributedCache`] is the only mutation entry point for text. Each
//! public call runs to completion before anything else can look at it:
//!
//! 1. validate the request (nothing mutates on error)
//! 2. splice the buffer and the run list by the same amount
//! 3. expand the edit to whole paragraphs (the dirty range)
//! 4. clear the dirty range, set the current font over it, and color every
//!    classified span
//! 5. build exactly one [`StorageChange`], hand it to every observer, and
//!    return it
//!
//! Attributes outside the dirty range are never touched, so classification
//! and coloring cost the size of the paragraphs an edit hit. Runs are found
//! by binary search; the only per-edit work proportional to the buffer is
//! shifting the start offsets that follow the edit.

use std::fmt;

use bitflags::bitflags;
use log::debug;

use crate::buffer::TextBuffer;
use crate::classify::Classifier;
use crate::error::{Result, TextError};
use crate::range::CharRange;
use crate::runs::{AttributedRun, RunList};
use crate::style::{Attributes, Font};

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

bitflags! {
    /// What kind of change a [`StorageChange`] describes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct EditMask: u8 {
        /// Text was inserted, removed, or replaced.
        const CHARACTERS = 1;
        /// Attributes were rewritten.
        const ATTRIBUTES = 1 << 1;
    }
}

/// One coalesced notification per public call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageChange {
    pub edited: EditMask,
    /// The affected range, in post-change coordinates.
    pub range: CharRange,
    /// Zero for attribute-only changes.
    pub change_in_length: isize,
}

/// Something that wants to hear about storage changes, typically a
/// renderer that re-lays-out the affected region.
pub trait StorageObserver {
    fn storage_did_change(&mut self, change: &StorageChange);
}

impl<F: FnMut(&StorageChange)> StorageObserver for F {
    fn storage_did_change(&mut self, change: &StorageChange) {
        self(change);
    }
}

// ---------------------------------------------------------------------------
// AttributedCache
// ---------------------------------------------------------------------------

/// A text buffer and its per-char attributes, re-attributed a paragraph at
/// a time.
pub struct AttributedCache {
    buffer: Option<TextBuffer>,
    runs: RunList,
    classifier: Classifier,
    font: Font,
    observers: Vec<Box<dyn StorageObserver>>,
}

impl AttributedCache {
    /// A cache with no content yet. Edits fail until
    /// [`set_content`](Self::set_content) is called.
    #[must_use]
    pub const fn new(classifier: Classifier, font: Font) -> Self {
        Self {
            buffer: None,
            runs: RunList::new(),
            classifier,
            font,
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is called once per successful mutation.
    pub fn add_observer(&mut self, observer: Box<dyn StorageObserver>) {
        self.observers.push(observer);
    }

    // -- Accessors ----------------------------------------------------------

    /// The buffer, once content has been assigned.
    #[inline]
    #[must_use]
    pub const fn content(&self) -> Option<&TextBuffer> {
        self.buffer.as_ref()
    }

    /// Length of the attribute shadow. Equal to the buffer length after
    /// every public call.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn font(&self) -> &Font {
        &self.font
    }

    // -- Mutation -----------------------------------------------------------

    /// Replace the whole content and attribute all of it.
    ///
    /// # Errors
    ///
    /// Only internal contract failures, which would indicate a bug in the
    /// paragraph index.
    pub fn set_content(&mut self, buffer: TextBuffer) -> Result<StorageChange> {
        let old_len = self.len();
        let new_len = buffer.len();
        let all = CharRange::new(0, new_len);

        let mut runs = RunList::uniform(new_len, Attributes::none());
        attribute(&self.classifier, &buffer, &mut runs, &self.font, all)?;
        self.buffer = Some(buffer);
        self.runs = runs;

        debug!("content set: {new_len} chars");
        Ok(self.finish(StorageChange {
            edited: EditMask::CHARACTERS | EditMask::ATTRIBUTES,
            range: all,
            change_in_length: signed(new_len) - signed(old_len),
        }))
    }

    /// Switch the font and re-attribute everything. Before any content is
    /// assigned this only records the font and returns `None`.
    ///
    /// # Errors
    ///
    /// Only internal contract failures.
    pub fn set_font(&mut self, font: Font) -> Result<Option<StorageChange>> {
        self.font = font;
        let Some(buffer) = &self.buffer else {
            return Ok(None);
        };

        let all = CharRange::new(0, buffer.len());
        let mut runs = self.runs.clone();
        attribute(&self.classifier, buffer, &mut runs, &self.font, all)?;
        self.runs = runs;

        debug!("font set to {}", self.font);
        Ok(Some(self.finish(StorageChange {
            edited: EditMask::ATTRIBUTES,
            range: all,
            change_in_length: 0,
        })))
    }

    /// Replace `range` with `text` and re-attribute the paragraphs the edit
    /// touched.
    ///
    /// The dirty range is the paragraph range of the inserted text plus the
    /// first char after it, so splitting or joining paragraphs re-attributes
    /// the paragraph that follows the edit as well.
    ///
    /// # Errors
    ///
    /// - [`TextError::Uninitialized`] before [`set_content`](Self::set_content).
    /// - [`TextError::OutOfBounds`] when `range.end > len()`.
    ///
    /// In both cases nothing has changed.
    pub fn apply_edit(&mut self, range: CharRange, text: &str) -> Result<StorageChange> {
        let buffer = self.buffer.as_mut().ok_or(TextError::Uninitialized)?;
        let edit = buffer.replace(range, text)?;
        self.runs.replace(range, edit.inserted)?;
        debug_assert_eq!(self.runs.len(), buffer.len(), "attribute shadow out of sync");

        let inserted = edit.new_range();
        let probe = CharRange::new(inserted.start, (inserted.end + 1).min(buffer.len()));
        let dirty = buffer.paragraph_range(probe)?;
        attribute(&self.classifier, buffer, &mut self.runs, &self.font, dirty)?;

        debug!(
            "edit {range} -> {} chars (delta {}), dirty {dirty}",
            edit.inserted,
            edit.change_in_length()
        );
        Ok(self.finish(StorageChange {
            edited: EditMask::CHARACTERS | EditMask::ATTRIBUTES,
            range: dirty,
            change_in_length: edit.change_in_length(),
        }))
    }

    // -- Queries ------------------------------------------------------------

    /// 1-based paragraph number at `index`.
    ///
    /// # Errors
    ///
    /// [`TextError::Uninitialized`] before content, [`TextError::OutOfBounds`]
    /// when `index > len()`.
    pub fn paragraph_ordinal(&self, index: usize) -> Result<usize> {
        self.buffer
            .as_ref()
            .ok_or(TextError::Uninitialized)?
            .paragraph_ordinal(index)
    }

    /// The attributes at `index` and the extent of the run that holds them.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `index >= len()`.
    pub fn attributes_at(&self, index: usize) -> Result<(Attributes, CharRange)> {
        self.runs
            .attributes_at(index)
            .ok_or(TextError::OutOfBounds {
                range: CharRange::with_len(index, 1),
                len: self.len(),
            })
    }

    /// Attribute runs overlapping `range`, clipped to it.
    ///
    /// # Errors
    ///
    /// [`TextError::OutOfBounds`] when `range.end > len()`.
    pub fn runs(&self, range: CharRange) -> Result<Vec<AttributedRun>> {
        if range.end > self.len() {
            return Err(TextError::OutOfBounds {
                range,
                len: self.len(),
            });
        }
        Ok(self.runs.runs_in(range))
    }

    // -- Helpers ------------------------------------------------------------

    fn finish(&mut self, change: StorageChange) -> StorageChange {
        for observer in &mut self.observers {
            observer.storage_did_change(&change);
        }
        change
    }
}

impl fmt::Debug for AttributedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributedCache")
            .field("buffer", &self.buffer)
            .field("runs", &self.runs.run_count())
            .field("font", &self.font)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Clear `dirty`, set `font` over it, and color each classified span.
fn attribute(
    classifier: &Classifier,
    buffer: &TextBuffer,
    runs: &mut RunList,
    font: &Font,
    dirty: CharRange,
) -> Result<()> {
    let spans = classifier.classify(buffer, dirty)?;
    runs.set(dirty, Attributes::with_font(font.clone()))?;
    for span in spans {
        runs.add_color(span.range, span.kind.color())?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(n: usize) -> isize {
    n as isize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
