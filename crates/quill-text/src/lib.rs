//! # quill-text: Text core for quill
//!
//! This crate owns everything that happens between "the user typed
//! something" and "every character has a color and a font":
//!
//! - **[`range`]**: `CharRange`, a half-open char-index range
//! - **[`paragraph`]**: incremental index of paragraph starts
//! - **[`buffer`]**: `TextBuffer`, a rope with paragraph queries
//! - **[`classify`]**: the paragraph-granular semantic classifier
//! - **[`style`]**: colors, fonts, and the kind → color mapping
//! - **[`runs`]**: run-length attribute storage
//! - **[`storage`]**: `AttributedCache`, the buffer + attribute pair that
//!   re-attributes exactly the dirty paragraphs after each edit
//! - **[`error`]**: the error taxonomy shared by all of the above
//!
//! # Pipeline
//!
//! ```text
//! apply_edit(range, text)
//!     │
//!     ▼
//! TextBuffer::replace      rope splice + paragraph index update
//!     │
//!     ▼
//! RunList::replace         attribute shadow stays the same length
//!     │
//!     ▼
//! paragraph_range(edit)    dirty range, always whole paragraphs
//!     │
//!     ▼
//! Classifier::classify     Text / Comment / Keyword spans
//!     │
//!     ▼
//! StorageChange            one coalesced notification per edit
//! ```

pub mod buffer;
pub mod classify;
pub mod error;
pub mod paragraph;
pub mod range;
pub mod runs;
pub mod storage;
pub mod style;

pub use buffer::{TextBuffer, TextEdit};
pub use classify::{Classifier, KeywordSet, SemanticKind, Span};
pub use error::{ContractViolation, Result, TextError};
pub use range::CharRange;
pub use storage::{AttributedCache, EditMask, StorageChange, StorageObserver};
pub use style::{Attributes, Color, Font};
