//! Raster drawing surface built on the `image` and `rusttype` crates.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory` |
//! | Scale into a rect | `image::imageops::resize` with `Triangle` filter |
//! | Alpha compositing | [`blend_pixel`] (source-over, straight alpha) |
//! | Text | `rusttype` glyph layout + per-pixel coverage |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, Surface};
use super::calculations::Rect;
use super::params::{Align, Opacity, Quality, TextStyle};
use super::text::{FontFace, TextMeasure};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageReader, Rgba, RgbaImage};
use rusttype::point;
use std::io::Cursor;
use std::path::Path;

/// An RGBA pixel buffer plus the face used for its text.
pub struct RasterSurface {
    canvas: RgbaImage,
    font: FontFace,
}

impl RasterSurface {
    /// A fully transparent surface of the given size.
    pub fn new(width: u32, height: u32, font: FontFace) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            font,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Integer pixel span `[start, end)` of a float range, clipped to `limit`.
    fn span(start: f64, length: f64, limit: u32) -> (u32, u32) {
        let from = start.round().clamp(0.0, limit as f64) as u32;
        let to = (start + length).round().clamp(0.0, limit as f64) as u32;
        (from, to.max(from))
    }
}

impl TextMeasure for RasterSurface {
    fn line_width(&self, text: &str, font_size: f32) -> f32 {
        self.font.line_width(text, font_size)
    }
}

impl Surface for RasterSurface {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let (x0, x1) = Self::span(rect.x, rect.width, self.canvas.width());
        let (y0, y1) = Self::span(rect.y, rect.height, self.canvas.height());
        for y in y0..y1 {
            for x in x0..x1 {
                if color[3] == 255 {
                    self.canvas.put_pixel(x, y, color);
                } else {
                    blend_pixel(self.canvas.get_pixel_mut(x, y), &color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, opacity: Opacity) {
        let width = dest.width.round().max(1.0) as u32;
        let height = dest.height.round().max(1.0) as u32;
        let scaled;
        let source = if image.dimensions() == (width, height) {
            image
        } else {
            scaled = image::imageops::resize(image, width, height, FilterType::Triangle);
            &scaled
        };

        let left = dest.x.round() as i64;
        let top = dest.y.round() as i64;
        let alpha_scale = opacity.value();
        let (canvas_w, canvas_h) = (self.canvas.width() as i64, self.canvas.height() as i64);

        for (sx, sy, pixel) in source.enumerate_pixels() {
            let (px, py) = (left + sx as i64, top + sy as i64);
            if px < 0 || py < 0 || px >= canvas_w || py >= canvas_h {
                continue;
            }
            let alpha = (pixel[3] as f32 * alpha_scale).round() as u8;
            let overlay = Rgba([pixel[0], pixel[1], pixel[2], alpha]);
            blend_pixel(self.canvas.get_pixel_mut(px as u32, py as u32), &overlay);
        }
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        let scale = self.font.em_scale(style.font_size);
        let ascent = self.font.font().v_metrics(scale).ascent;
        let left = match style.align {
            Align::Left => x as f32,
            Align::Center => x as f32 - self.font.line_width(text, style.font_size) / 2.0,
        };
        let origin = point(left, y as f32 + ascent);
        let color = style.color;
        let (canvas_w, canvas_h) = (self.canvas.width() as i32, self.canvas.height() as i32);

        for glyph in self.font.font().layout(text, scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let canvas = &mut self.canvas;
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= canvas_w || py >= canvas_h {
                    return;
                }
                let alpha = (coverage * color[3] as f32).round() as u8;
                let overlay = Rgba([color[0], color[1], color[2], alpha]);
                blend_pixel(canvas.get_pixel_mut(px as u32, py as u32), &overlay);
            });
        }
    }
}

/// Source-over composite of `overlay` onto `base`, both straight alpha.
fn blend_pixel(base: &mut Rgba<u8>, overlay: &Rgba<u8>) {
    let src_a = overlay[3] as f32 / 255.0;
    if src_a <= 0.0 {
        return;
    }
    let dst_a = base[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for idx in 0..3 {
        let blended =
            (overlay[idx] as f32 * src_a + base[idx] as f32 * dst_a * (1.0 - src_a)) / out_a;
        base[idx] = blended.round().clamp(0.0, 255.0) as u8;
    }
    base[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Decode an in-memory image in any compiled-in format.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Read dimensions from an encoded image's header without decoding pixels.
pub fn image_dimensions(bytes: &[u8]) -> Result<Dimensions, BackendError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(Dimensions { width, height })
}

/// Flatten to RGB and encode as baseline JPEG.
pub fn encode_jpeg(image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.value())
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    Ok(bytes)
}
