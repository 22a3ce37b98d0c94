//! Plain geometry values in layout units (points).
//!
//! `y` grows downward. Nothing here knows about text.

use quill_text::CharRange;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    #[must_use]
    pub fn mid_y(&self) -> f32 {
        self.size.height.mul_add(0.5, self.origin.y)
    }

    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// The same rect moved right by `dx`.
    #[must_use]
    pub fn offset_x(self, dx: f32) -> Self {
        Self {
            origin: Point::new(self.origin.x + dx, self.origin.y),
            size: self.size,
        }
    }
}

/// Horizontal insets of a line fragment. Only `left` is ever computed;
/// `right` is always zero but kept so callers subtract both.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
}

impl Insets {
    #[inline]
    #[must_use]
    pub const fn left(left: f32) -> Self {
        Self { left, right: 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// One laid-out line: the chars it shows and where it sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFragment {
    pub chars: CharRange,
    pub rect: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 8.0);
        assert_eq!(r.min_x(), 10.0);
        assert_eq!(r.max_x(), 40.0);
        assert_eq!(r.mid_y(), 24.0);
        assert_eq!(r.max_y(), 28.0);
    }

    #[test]
    fn offset_keeps_size() {
        let r = Rect::new(0.0, 5.0, 100.0, 10.0).offset_x(16.0);
        assert_eq!(r, Rect::new(16.0, 5.0, 100.0, 10.0));
    }

    #[test]
    fn insets_are_left_only() {
        let i = Insets::left(12.5);
        assert_eq!(i.right, 0.0);
        assert_eq!(i.horizontal(), 12.5);
    }
}
