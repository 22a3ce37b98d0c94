//! Paragraph numbers for the gutter.
//!
//! Only the first line of a paragraph gets a number; continuation lines
//! leave the gutter blank. A label fills the space left of its line, so its
//! width is the line's x, and it is centred vertically on the line.

use quill_text::{AttributedCache, ContractViolation, Result};

use crate::geometry::{LineFragment, Point, Rect};
use crate::metrics::LayoutMetrics;

/// A paragraph number and where to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GutterLabel {
    pub number: usize,
    pub rect: Rect,
}

/// Labels for `fragments`, drawn at `origin` with text `label_height` tall.
/// Empty when the gutter is disabled.
///
/// # Errors
///
/// [`ContractViolation::LayoutWithoutContent`] before content is set, or
/// an out-of-bounds error for a fragment past the end of the buffer.
pub fn paragraph_labels(
    metrics: &LayoutMetrics,
    cache: &AttributedCache,
    fragments: &[LineFragment],
    origin: Point,
    label_height: f32,
) -> Result<Vec<GutterLabel>> {
    if !metrics.config().gutter_enabled {
        return Ok(Vec::new());
    }
    let buffer = cache
        .content()
        .ok_or(ContractViolation::LayoutWithoutContent)?;

    let mut labels = Vec::new();
    for fragment in fragments {
        let paragraph = buffer.paragraph_range(fragment.chars)?;
        if fragment.chars.start != paragraph.start {
            continue;
        }
        let line = fragment.rect;
        labels.push(GutterLabel {
            number: buffer.paragraph_ordinal(paragraph.start)?,
            rect: Rect::new(
                origin.x,
                line.mid_y() - label_height * 0.5 + origin.y,
                line.origin.x,
                label_height,
            ),
        });
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::LayoutConfig;
    use crate::wrap::MonospaceLayout;
    use pretty_assertions::assert_eq;
    use quill_text::{Classifier, Font, TextBuffer};

    fn cache(text: &str) -> AttributedCache {
        let mut cache = AttributedCache::new(Classifier::default(), Font::new("Menlo", 10.0));
        cache.set_content(TextBuffer::from_text(text)).unwrap();
        cache
    }

    fn numbered() -> LayoutMetrics {
        LayoutMetrics::new(LayoutConfig {
            gutter_enabled: true,
            ..LayoutConfig::default()
        })
    }

    #[test]
    fn one_label_per_paragraph() {
        let cache = cache("abcdefghijklmnop\nx\n");
        let metrics = numbered();
        let layout = MonospaceLayout::build(&cache, &metrics, 76.0).unwrap();
        let labels =
            paragraph_labels(&metrics, &cache, layout.fragments(), Point::ZERO, 9.0).unwrap();

        let numbers: Vec<usize> = labels.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(layout.line_count() > 3);
    }

    #[test]
    fn label_rect_fills_gutter_and_centres() {
        let cache = cache("a\n");
        let metrics = numbered();
        let layout = MonospaceLayout::build(&cache, &metrics, 100.0).unwrap();
        let labels =
            paragraph_labels(&metrics, &cache, layout.fragments(), Point::new(2.0, 5.0), 8.0)
                .unwrap();
        // Line 1 spans y 0..12, so its middle is 6.
        assert_eq!(labels[0].rect, Rect::new(2.0, 6.0 - 4.0 + 5.0, 16.0, 8.0));
    }

    #[test]
    fn disabled_gutter_draws_nothing() {
        let cache = cache("a\nb\n");
        let metrics = LayoutMetrics::default();
        let layout = MonospaceLayout::build(&cache, &metrics, 100.0).unwrap();
        let labels =
            paragraph_labels(&metrics, &cache, layout.fragments(), Point::ZERO, 9.0).unwrap();
        assert!(labels.is_empty());
    }
}
