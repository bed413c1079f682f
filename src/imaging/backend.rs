//! Drawing surface trait and shared types.
//!
//! The [`Surface`] trait is the set of primitives the collage compositor
//! needs: fill a rectangle, draw a scaled image, draw a line of text, and
//! measure text. Each call carries its own style, so a surface has no
//! ambient drawing state.
//!
//! The production implementation is
//! [`RasterSurface`](super::rust_backend::RasterSurface), an RGBA buffer
//! drawn with the `image` and `rusttype` crates.

use super::calculations::Rect;
use super::params::{Opacity, TextStyle};
use super::text::TextMeasure;
use image::{Rgba, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error("Image encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for drawing targets.
///
/// Calls are applied in order; later draws cover earlier ones.
pub trait Surface: TextMeasure {
    fn dimensions(&self) -> Dimensions;

    /// Fill `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Draw `image` scaled into `dest`, each pixel's alpha multiplied by
    /// `opacity`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, opacity: Opacity);

    /// Draw one line of text whose top edge is at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Align;

    /// Surface that records draw calls without touching pixels.
    ///
    /// Text measures as `chars * font_size * advance`.
    pub struct RecordingSurface {
        pub size: Dimensions,
        pub advance: f32,
        pub operations: Vec<DrawOp>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Fill {
            rect: Rect,
            color: Rgba<u8>,
        },
        Image {
            source: (u32, u32),
            dest: Rect,
            opacity: Opacity,
        },
        Text {
            text: String,
            x: f64,
            y: f64,
            style: TextStyle,
        },
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: Dimensions { width, height },
                advance: 0.5,
                operations: Vec::new(),
            }
        }

        pub fn images(&self) -> Vec<(&(u32, u32), &Rect, &Opacity)> {
            self.operations
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Image {
                        source,
                        dest,
                        opacity,
                    } => Some((source, dest, opacity)),
                    _ => None,
                })
                .collect()
        }

        pub fn texts(&self) -> Vec<(&str, f64, f64, &TextStyle)> {
            self.operations
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, x, y, style } => Some((text.as_str(), *x, *y, style)),
                    _ => None,
                })
                .collect()
        }
    }

    impl TextMeasure for RecordingSurface {
        fn line_width(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * font_size * self.advance
        }
    }

    impl Surface for RecordingSurface {
        fn dimensions(&self) -> Dimensions {
            self.size
        }

        fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
            self.operations.push(DrawOp::Fill { rect, color });
        }

        fn draw_image(&mut self, image: &RgbaImage, dest: Rect, opacity: Opacity) {
            self.operations.push(DrawOp::Image {
                source: image.dimensions(),
                dest,
                opacity,
            });
        }

        fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
            self.operations.push(DrawOp::Text {
                text: text.to_string(),
                x,
                y,
                style,
            });
        }
    }

    #[test]
    fn recording_surface_keeps_call_order() {
        let mut surface = RecordingSurface::new(100, 50);
        surface.fill_rect(Rect::new(0.0, 0.0, 100.0, 50.0), Rgba([255, 255, 255, 255]));
        surface.draw_image(
            &RgbaImage::new(4, 3),
            Rect::new(1.0, 2.0, 8.0, 6.0),
            Opacity::new(0.5),
        );
        surface.draw_text(
            "hi",
            50.0,
            10.0,
            TextStyle {
                font_size: 12.0,
                color: Rgba([0, 0, 0, 255]),
                align: Align::Center,
            },
        );

        assert_eq!(surface.operations.len(), 3);
        assert!(matches!(surface.operations[0], DrawOp::Fill { .. }));
        let images = surface.images();
        assert_eq!(images.len(), 1);
        assert_eq!(*images[0].0, (4, 3));
        assert_eq!(images[0].2.value(), 0.5);
        assert_eq!(surface.texts()[0].0, "hi");
    }

    #[test]
    fn recording_surface_measures_by_char_count() {
        let surface = RecordingSurface::new(10, 10);
        assert_eq!(surface.line_width("abcd", 10.0), 20.0);
    }
}
