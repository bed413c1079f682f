//! Shared test utilities for the delivery-collage test suite.
//!
//! Provides synthetic images, encoded fixtures and metadata builders so unit
//! tests never need files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photo = record(640, 480, metadata_at("Stop 1", 2026, 10, 16, 9, 30));
//! let mark = png_bytes(&solid_rgba(40, 20, Rgba([0, 0, 0, 255])));
//! ```

use crate::imaging::TextMeasure;
use crate::types::{CaptureMetadata, Coordinates, PhotoRecord};
use chrono::{NaiveDate, NaiveDateTime};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Text measurement
// =========================================================================

/// Measures every character as `advance * font_size` pixels wide.
pub struct FixedAdvance(pub f32);

impl TextMeasure for FixedAdvance {
    fn line_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.0
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Opaque RGB image of a single color.
pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn solid_rgba(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn jpeg_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

// =========================================================================
// Metadata + records
// =========================================================================

pub fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Metadata with a label and timestamp but no location.
pub fn metadata_at(
    label: &str,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> CaptureMetadata {
    CaptureMetadata {
        captured_at: Some(timestamp(year, month, day, hour, minute)),
        stop_label: label.to_string(),
        ..Default::default()
    }
}

pub fn with_coordinates(mut metadata: CaptureMetadata, lat: f64, lon: f64) -> CaptureMetadata {
    metadata.coordinates = Some(Coordinates::new(lat, lon));
    metadata
}

pub fn with_address(mut metadata: CaptureMetadata, address: &str) -> CaptureMetadata {
    metadata.address = Some(address.to_string());
    metadata
}

/// A gray photo of the given size carrying `metadata`.
pub fn record(width: u32, height: u32, metadata: CaptureMetadata) -> PhotoRecord {
    PhotoRecord::new(solid_image(width, height, [128, 128, 128]), metadata)
}
