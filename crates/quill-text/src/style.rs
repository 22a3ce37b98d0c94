//! Style values attached to characters: colors, fonts, and the
//! semantic kind → color mapping.
//!
//! Everything here is a plain value. `Font` shares its family name through
//! an `Arc<str>`, so cloning one per attribute run costs a refcount bump.

use std::fmt;
use std::sync::Arc;

use crate::classify::SemanticKind;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const ORANGE: Self = Self::rgb(255, 127, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components as floats in `0.0..=1.0`.
    #[must_use]
    pub fn to_srgb(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl SemanticKind {
    /// The foreground color every span of this kind is drawn in.
    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Text => Color::BLACK,
            Self::Comment => Color::GREEN,
            Self::Pragma => Color::ORANGE,
            Self::Keyword => Color::BLUE,
        }
    }
}

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// A font reference: family name plus point size.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: Arc<str>,
    size: f32,
}

impl Font {
    pub const DEFAULT_FAMILY: &'static str = "Menlo";
    pub const DEFAULT_SIZE: f32 = 13.0;

    #[must_use]
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: Arc::from(family),
            size,
        }
    }

    #[inline]
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Same family at a different size.
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            family: Arc::clone(&self.family),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAMILY, Self::DEFAULT_SIZE)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.size)
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// The attributes carried by one character. Either slot may be unset, as
/// it is right after a range is cleared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub font: Option<Font>,
    pub color: Option<Color>,
}

impl Attributes {
    /// No font, no color.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            font: None,
            color: None,
        }
    }

    /// Only a font.
    #[must_use]
    pub const fn with_font(font: Font) -> Self {
        Self {
            font: Some(font),
            color: None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.font.is_none() && self.color.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
