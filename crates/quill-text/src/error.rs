//! Error taxonomy.
//!
//! Every error here is a caller contract violation, not a transient runtime
//! condition: there is no I/O in this crate, so nothing is worth retrying.
//! Operations validate before they mutate, so an `Err` always means the
//! buffer and its attribute shadow are exactly as they were before the call.

use thiserror::Error;

use crate::range::CharRange;

/// Errors returned by buffer, classifier, and cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// A range or index reaches past the end of the buffer.
    #[error("range {range} is out of bounds for a buffer of {len} chars")]
    OutOfBounds { range: CharRange, len: usize },

    /// A component was called in a way its contract forbids.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),

    /// An edit arrived before any content was assigned.
    #[error("no content has been assigned yet")]
    Uninitialized,
}

/// The ways a caller can break a component's contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// The classifier only accepts whole paragraphs.
    #[error("range {range} is not paragraph-aligned (expected {expected})")]
    UnalignedRange {
        range: CharRange,
        expected: CharRange,
    },

    /// Layout queries need content to measure against.
    #[error("layout was queried before content was assigned")]
    LayoutWithoutContent,
}

/// Result alias used throughout quill-text.
pub type Result<T> = std::result::Result<T, TextError>;
