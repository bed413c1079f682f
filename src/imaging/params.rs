//! Parameter types for drawing operations.
//!
//! Every call on a [`Surface`](super::backend::Surface) receives its style
//! explicitly through these types. Nothing like a "current fill color" or
//! "current alpha" lives on the surface, so one drawing step cannot leak
//! state into the next.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 95). Clamped on construction.
//! - [`Opacity`]: Alpha multiplier for image draws (0.0–1.0). Clamped on construction.
//! - [`Align`]: Horizontal text anchoring.
//! - [`TextStyle`]: Font size, color and alignment for one text draw.

use image::Rgba;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Alpha multiplier applied to every pixel of a drawn image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);

    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// Horizontal anchoring of a text line relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// `x` is the left edge of the line.
    #[default]
    Left,
    /// `x` is the horizontal center of the line.
    Center,
}

/// Style for a single text draw. `y` passed alongside is the top of the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Rgba<u8>,
    pub align: Align,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_95() {
        assert_eq!(Quality::default().value(), 95);
    }

    #[test]
    fn opacity_clamps() {
        assert_eq!(Opacity::new(-1.0).value(), 0.0);
        assert_eq!(Opacity::new(0.5).value(), 0.5);
        assert_eq!(Opacity::new(3.0), Opacity::OPAQUE);
    }
}
