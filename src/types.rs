//! Shared types passed between the capture, compose and export stages.
//!
//! A [`PhotoRecord`] is what the camera produces, a [`Report`] is what one
//! delivery stop turns into, and [`CaptureMetadata`] travels with both.

use chrono::NaiveDateTime;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Metadata stamped onto a photo at capture time.
///
/// Every field except `stop_label` is best-effort: a missing location never
/// blocks composition, it only changes what the caption says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// Local wall-clock time of the capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Human-readable address from reverse geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Label the user typed for the stop, possibly empty.
    #[serde(default)]
    pub stop_label: String,
}

/// One captured photo. Immutable once created.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub image: DynamicImage,
    pub metadata: CaptureMetadata,
}

impl PhotoRecord {
    pub fn new(image: DynamicImage, metadata: CaptureMetadata) -> Self {
        Self { image, metadata }
    }
}

/// A flattened, JPEG-encoded collage.
///
/// Clones share the encoded buffer, so a report handed out by the session
/// ledger points at the same bytes the ledger holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportImage {
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl ReportImage {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes: Arc::from(bytes),
            width,
            height,
        }
    }

    /// True when both images refer to the same encoded buffer.
    pub fn same_buffer(&self, other: &ReportImage) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

/// A finalized delivery stop: composite image plus the metadata of the
/// first photo that went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub image: ReportImage,
    pub metadata: CaptureMetadata,
}
