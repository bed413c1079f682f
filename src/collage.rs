//! Collage composition: the photos of one stop flattened into a report JPEG.
//!
//! Draw order on the canvas:
//!
//! 1. Backgrounds: white photo area, light-gray caption band.
//! 2. Photos in store order, each fitted into its grid cell.
//! 3. The watermark, if set, at reduced opacity over the photo area.
//! 4. The caption built from the first photo's metadata, if enabled.
//!
//! [`compose_onto`] runs the sequence against any [`Surface`];
//! [`compose`] runs it on a [`RasterSurface`] and encodes the result.

use crate::config::{ReportConfig, parse_hex_color};
use crate::imaging::{
    BackendError, CaptionLayout, FittedText, FontFace, Opacity, Placement, Quality,
    RasterSurface, Surface, draw_backgrounds, draw_caption, draw_photos, draw_watermark,
    encode_jpeg,
};
use crate::metadata::caption_text;
use crate::types::{PhotoRecord, ReportImage};
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollageError {
    #[error("No photos to compose")]
    NoPhotos,
    #[error("Invalid color {key}: {reason}")]
    InvalidColor { key: &'static str, reason: String },
    #[error("Image error: {0}")]
    Backend(#[from] BackendError),
}

/// Everything composition needs from the configuration, resolved once.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageSettings {
    pub width: u32,
    pub height: u32,
    pub caption_band: u32,
    pub quality: Quality,
    pub photo_background: Rgba<u8>,
    pub caption_background: Rgba<u8>,
    pub caption: CaptionLayout,
    pub max_chars_per_line: usize,
    pub watermark_fraction: f64,
    pub watermark_opacity: Opacity,
}

impl CollageSettings {
    pub fn from_config(config: &ReportConfig) -> Result<Self, CollageError> {
        let color = |key: &'static str, value: &str| {
            parse_hex_color(value)
                .map(Rgba)
                .map_err(|reason| CollageError::InvalidColor { key, reason })
        };
        Ok(Self {
            width: config.collage.width,
            height: config.collage.height,
            caption_band: config.collage.caption_band,
            quality: Quality::new(config.collage.quality),
            photo_background: color("photo_background", &config.colors.photo_background)?,
            caption_background: color("caption_background", &config.colors.caption_background)?,
            caption: CaptionLayout {
                start_size: config.caption.font_size,
                min_size: config.caption.min_font_size,
                line_height: config.caption.line_height,
                side_padding: config.caption.side_padding,
                color: color("caption_text", &config.colors.caption_text)?,
            },
            max_chars_per_line: config.caption.max_chars_per_line,
            watermark_fraction: config.watermark.width_fraction as f64,
            watermark_opacity: Opacity::new(config.watermark.opacity),
        })
    }
}

/// What [`compose_onto`] placed, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageLayout {
    pub photos: Vec<Placement>,
    pub watermark: Option<Placement>,
    pub caption: Option<FittedText>,
}

/// Draw a collage onto `surface`.
///
/// Fails with [`CollageError::NoPhotos`] before drawing anything when
/// `photos` is empty.
pub fn compose_onto(
    surface: &mut impl Surface,
    photos: &[PhotoRecord],
    watermark: Option<&RgbaImage>,
    include_metadata: bool,
    settings: &CollageSettings,
) -> Result<CollageLayout, CollageError> {
    let Some(first) = photos.first() else {
        return Err(CollageError::NoPhotos);
    };

    draw_backgrounds(
        surface,
        settings.caption_band,
        settings.photo_background,
        settings.caption_background,
    );

    let images: Vec<&DynamicImage> = photos.iter().map(|p| &p.image).collect();
    let placements = draw_photos(surface, &images, settings.caption_band);

    let watermark = watermark.map(|mark| {
        draw_watermark(
            surface,
            mark,
            settings.caption_band,
            settings.watermark_fraction,
            settings.watermark_opacity,
        )
    });

    let caption = include_metadata.then(|| {
        let text = caption_text(&first.metadata, settings.max_chars_per_line);
        draw_caption(surface, &text, settings.caption_band, &settings.caption)
    });

    Ok(CollageLayout {
        photos: placements,
        watermark,
        caption,
    })
}

/// Compose `photos` into a JPEG report image.
pub fn compose(
    photos: &[PhotoRecord],
    watermark: Option<&RgbaImage>,
    include_metadata: bool,
    settings: &CollageSettings,
    font: &FontFace,
) -> Result<ReportImage, CollageError> {
    if photos.is_empty() {
        return Err(CollageError::NoPhotos);
    }

    let mut surface = RasterSurface::new(settings.width, settings.height, font.clone());
    let layout = compose_onto(&mut surface, photos, watermark, include_metadata, settings)?;
    if let Some(caption) = &layout.caption {
        debug!(
            "Caption: {} line(s) at {}px",
            caption.lines.len(),
            caption.font_size
        );
    }

    let canvas = surface.into_image();
    let bytes = encode_jpeg(&canvas, settings.quality)?;
    debug!(
        "Composed {} photo(s) into {}x{} JPEG ({} bytes)",
        photos.len(),
        canvas.width(),
        canvas.height(),
        bytes.len()
    );
    Ok(ReportImage::new(bytes, canvas.width(), canvas.height()))
}
