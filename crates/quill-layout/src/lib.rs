//! # quill-layout: Line geometry for quill
//!
//! Everything a line breaker needs to ask about a line, given the content
//! held by a [`quill_text::AttributedCache`]:
//!
//! - **[`metrics`]**: `LayoutMetrics` with insets, wrap indent, tab stops,
//!   line spacing
//! - **[`measure`]**: the injected `TextMeasure` / `GlyphLayout` traits
//!   and a `Monospace` measure
//! - **[`wrap`]**: `MonospaceLayout`, a fixed-pitch line breaker that
//!   drives `LayoutMetrics` the way a real text system would
//! - **[`gutter`]**: paragraph-number labels
//! - **[`options`]**: `:set`-style configuration
//! - **[`geometry`]**: points, sizes, rects, insets
//! - **[`error`]**: `ConfigError`
//!
//! Layout queries fail with [`quill_text::TextError`]; querying before any
//! content exists is [`quill_text::ContractViolation::LayoutWithoutContent`].

pub mod error;
pub mod geometry;
pub mod gutter;
pub mod measure;
pub mod metrics;
pub mod options;
pub mod wrap;

pub use error::ConfigError;
pub use geometry::{Insets, LineFragment, Point, Rect, Size};
pub use gutter::{paragraph_labels, GutterLabel};
pub use measure::{GlyphLayout, Monospace, TextMeasure};
pub use metrics::{
    ControlCharacterAction, Invalidation, LayoutConfig, LayoutMetrics, LineLayout,
};
pub use options::{apply, apply_all, parse_set, Applied, SetDirective};
pub use wrap::MonospaceLayout;
