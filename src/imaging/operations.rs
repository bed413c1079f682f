//! High-level drawing operations.
//!
//! These functions combine calculations with surface calls. They take plain
//! parameters, compute placements, and draw. Each returns what it placed so
//! callers and tests can inspect the layout without reading pixels.

use super::backend::Surface;
use super::calculations::{
    Placement, Rect, caption_origin_y, compute_grid, fit_in_cell, watermark_placement,
};
use super::params::{Align, Opacity, TextStyle};
use super::text::{FittedText, fit_text};
use image::{DynamicImage, Rgba, RgbaImage};

/// Fill the photo area and the caption band with their background colors.
pub fn draw_backgrounds(
    surface: &mut impl Surface,
    caption_band: u32,
    photo_background: Rgba<u8>,
    caption_background: Rgba<u8>,
) {
    let size = surface.dimensions();
    let band_top = size.height.saturating_sub(caption_band);
    surface.fill_rect(
        Rect::new(0.0, 0.0, size.width as f64, band_top as f64),
        photo_background,
    );
    surface.fill_rect(
        Rect::new(0.0, band_top as f64, size.width as f64, caption_band as f64),
        caption_background,
    );
}

/// Draw `photos` into the grid, in order, each fitted to its cell.
pub fn draw_photos(
    surface: &mut impl Surface,
    photos: &[&DynamicImage],
    caption_band: u32,
) -> Vec<Placement> {
    let size = surface.dimensions();
    let cells = compute_grid(photos.len(), size.width, size.height, caption_band);

    cells
        .iter()
        .zip(photos)
        .map(|(cell, photo)| {
            let placement = fit_in_cell(&cell.rect, photo.width(), photo.height());
            surface.draw_image(&photo.to_rgba8(), placement.rect, Opacity::OPAQUE);
            placement
        })
        .collect()
}

/// Draw the watermark centered over the photo area.
pub fn draw_watermark(
    surface: &mut impl Surface,
    watermark: &RgbaImage,
    caption_band: u32,
    width_fraction: f64,
    opacity: Opacity,
) -> Placement {
    let size = surface.dimensions();
    let placement = watermark_placement(
        size.width,
        size.height.saturating_sub(caption_band),
        watermark.width(),
        watermark.height(),
        width_fraction,
    );
    surface.draw_image(watermark, placement.rect, opacity);
    placement
}

/// Font and spacing parameters for the caption band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    pub start_size: f32,
    pub min_size: f32,
    pub line_height: f32,
    /// Horizontal padding on each side; text is fitted to the width between.
    pub side_padding: u32,
    pub color: Rgba<u8>,
}

/// Fit `text` to the band width and draw it centered in the caption band.
pub fn draw_caption(
    surface: &mut impl Surface,
    text: &str,
    caption_band: u32,
    layout: &CaptionLayout,
) -> FittedText {
    let size = surface.dimensions();
    let max_width = size.width.saturating_sub(layout.side_padding.saturating_mul(2)) as f32;
    let fitted = fit_text(
        text,
        max_width,
        layout.start_size,
        layout.min_size,
        layout.line_height,
        &*surface,
    );

    let band_top = size.height.saturating_sub(caption_band);
    let top = caption_origin_y(
        band_top,
        caption_band,
        fitted.lines.len(),
        fitted.font_size,
        layout.line_height,
    );
    let style = TextStyle {
        font_size: fitted.font_size,
        color: layout.color,
        align: Align::Center,
    };
    let center_x = size.width as f64 / 2.0;
    for (line, y) in fitted.lines.iter().zip(fitted.line_tops(top)) {
        surface.draw_text(line, center_x, y, style);
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{DrawOp, RecordingSurface};
    use crate::test_helpers::solid_image;

    const GRAY: Rgba<u8> = Rgba([51, 51, 51, 255]);

    fn layout() -> CaptionLayout {
        CaptionLayout {
            start_size: 20.0,
            min_size: 10.0,
            line_height: 1.2,
            side_padding: 20,
            color: GRAY,
        }
    }

    #[test]
    fn backgrounds_split_at_band() {
        let mut surface = RecordingSurface::new(1200, 900);
        draw_backgrounds(&mut surface, 80, Rgba([255; 4]), Rgba([240, 240, 240, 255]));
        assert_eq!(
            surface.operations,
            vec![
                DrawOp::Fill {
                    rect: Rect::new(0.0, 0.0, 1200.0, 820.0),
                    color: Rgba([255; 4]),
                },
                DrawOp::Fill {
                    rect: Rect::new(0.0, 820.0, 1200.0, 80.0),
                    color: Rgba([240, 240, 240, 255]),
                },
            ]
        );
    }

    #[test]
    fn photos_drawn_in_order_inside_their_cells() {
        let a = solid_image(1920, 1080, [200, 0, 0]);
        let b = solid_image(1080, 1920, [0, 200, 0]);
        let c = solid_image(800, 800, [0, 0, 200]);
        let mut surface = RecordingSurface::new(1200, 900);
        let placements = draw_photos(&mut surface, &[&a, &b, &c], 80);

        let images = surface.images();
        let sources: Vec<(u32, u32)> = images.iter().map(|(s, _, _)| **s).collect();
        assert_eq!(sources, vec![(1920, 1080), (1080, 1920), (800, 800)]);
        let cells = compute_grid(3, 1200, 900, 80);
        for ((cell, placement), (_, dest, opacity)) in cells.iter().zip(&placements).zip(&images) {
            assert!(cell.rect.contains(&placement.rect));
            assert_eq!(placement.rect, **dest);
            assert_eq!(**opacity, Opacity::OPAQUE);
        }
    }

    #[test]
    fn watermark_uses_given_opacity_and_photo_area() {
        let mut surface = RecordingSurface::new(1200, 900);
        let mark = RgbaImage::new(100, 50);
        let placement = draw_watermark(&mut surface, &mark, 80, 0.2, Opacity::new(0.5));
        assert!((placement.rect.width - 240.0).abs() < 1e-6);
        assert!((placement.rect.y - (820.0 - 120.0) / 2.0).abs() < 1e-6);
        assert_eq!(surface.images()[0].2.value(), 0.5);
    }

    #[test]
    fn caption_lines_centered_in_band() {
        let mut surface = RecordingSurface::new(1200, 900);
        let fitted = draw_caption(&mut surface, "ID: Stop 1\nDate: 1/2/2026, 09:30", 80, &layout());
        assert_eq!(fitted.font_size, 20.0);

        let texts = surface.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].0, "ID: Stop 1");
        // 2 lines * 24px = 48px block in the 80px band starting at 820
        assert!((texts[0].2 - 836.0).abs() < 1e-4);
        assert!((texts[1].2 - 860.0).abs() < 1e-4);
        for (_, x, _, style) in &texts {
            assert_eq!(*x, 600.0);
            assert_eq!(style.align, Align::Center);
            assert_eq!(style.color, GRAY);
        }
    }

    #[test]
    fn long_caption_shrinks_to_band_width() {
        let mut surface = RecordingSurface::new(1200, 900);
        // 200 chars * 20 * 0.5 = 2000px against 1160px available
        let text = "x".repeat(200);
        let fitted = draw_caption(&mut surface, &text, 80, &layout());
        assert_eq!(fitted.font_size, 11.0);
        assert_eq!(surface.texts()[0].3.font_size, 11.0);
    }

    #[test]
    fn padding_wider_than_canvas_falls_back_to_min_size() {
        let mut surface = RecordingSurface::new(1200, 900);
        let wide = CaptionLayout {
            side_padding: u32::MAX,
            ..layout()
        };
        let fitted = draw_caption(&mut surface, "ID: Stop 1", 80, &wide);
        assert_eq!(fitted.font_size, 10.0);
        assert_eq!(surface.texts()[0].0, "ID: Stop 1");
    }
}
