//! Capture metadata: resolution at capture time and the text printed from it.
//!
//! The same [`CaptureMetadata`] feeds two renderings:
//!
//! - the **caption** drawn in the collage band ([`caption_lines`]), which
//!   leads with the stop label and word-wraps the address;
//! - the **report block** printed under each image in the PDF
//!   ([`report_metadata_lines`]), which leaves wrapping to the page.
//!
//! Every field is optional in practice. Missing pieces degrade to
//! "not available" text rather than errors.

use crate::imaging::wrap_words;
use crate::location::Locator;
use crate::types::{CaptureMetadata, Coordinates};
use chrono::NaiveDateTime;
use log::{debug, warn};

pub const LOCATION_NOT_AVAILABLE: &str = "Location: not available";
pub const METADATA_NOT_AVAILABLE: &str = "metadata not available";

/// Stamp a capture with `captured_at`, the locator's position and, when a
/// position is known, its address.
///
/// Locator failures are logged and leave the field empty.
pub fn resolve_metadata(
    captured_at: NaiveDateTime,
    stop_label: &str,
    locator: &mut impl Locator,
) -> CaptureMetadata {
    let coordinates = match locator.coordinates() {
        Ok(coords) => Some(coords),
        Err(e) => {
            warn!("No position for capture: {e}");
            None
        }
    };
    let address = coordinates.and_then(|coords| match locator.reverse_geocode(coords) {
        Ok(address) if !address.trim().is_empty() => Some(address),
        Ok(_) => None,
        Err(e) => {
            warn!("No address for {:.4}, {:.4}: {e}", coords.latitude, coords.longitude);
            None
        }
    });
    debug!(
        "Resolved metadata: coordinates={:?} address={:?}",
        coordinates, address
    );

    CaptureMetadata {
        captured_at: Some(captured_at),
        coordinates,
        address,
        stop_label: stop_label.trim().to_string(),
    }
}

/// `d/m/yyyy, HH:MM`, day and month without padding.
///
/// ```
/// # use delivery_collage::metadata::format_date;
/// let t = chrono::NaiveDate::from_ymd_opt(2026, 3, 7)
///     .unwrap()
///     .and_hms_opt(9, 5, 0)
///     .unwrap();
/// assert_eq!(format_date(&t), "7/3/2026, 09:05");
/// ```
pub fn format_date(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%-d/%-m/%Y, %H:%M").to_string()
}

pub fn format_coordinates(coordinates: &Coordinates) -> String {
    format!(
        "Lat: {:.4}, Lon: {:.4}",
        coordinates.latitude, coordinates.longitude
    )
}

/// Caption lines for the collage band.
///
/// Order is `ID`, `Date`, then location. The address is wrapped at
/// `max_chars` and only its first line carries the `Location:` prefix.
/// Without any field the caption is the single placeholder line.
pub fn caption_lines(metadata: &CaptureMetadata, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let label = metadata.stop_label.trim();
    if !label.is_empty() {
        lines.push(format!("ID: {label}"));
    }
    if let Some(at) = &metadata.captured_at {
        lines.push(format!("Date: {}", format_date(at)));
    }

    match (non_empty_address(metadata), &metadata.coordinates) {
        (Some(address), _) => {
            let mut wrapped = wrap_words(address, max_chars).into_iter();
            if let Some(first) = wrapped.next() {
                lines.push(format!("Location: {first}"));
            }
            lines.extend(wrapped);
        }
        (None, Some(coords)) => lines.push(format!("Location: {}", format_coordinates(coords))),
        (None, None) if lines.is_empty() => lines.push(METADATA_NOT_AVAILABLE.to_string()),
        (None, None) => lines.push(LOCATION_NOT_AVAILABLE.to_string()),
    }
    lines
}

/// [`caption_lines`] joined with hard line breaks.
pub fn caption_text(metadata: &CaptureMetadata, max_chars: usize) -> String {
    caption_lines(metadata, max_chars).join("\n")
}

/// Single location line: address, coordinates, or not available.
pub fn location_line(metadata: &CaptureMetadata) -> String {
    match (non_empty_address(metadata), &metadata.coordinates) {
        (Some(address), _) => format!("Location: {address}"),
        (None, Some(coords)) => format!("Location: {}", format_coordinates(coords)),
        (None, None) => LOCATION_NOT_AVAILABLE.to_string(),
    }
}

/// Lines printed under a report image in the exported document.
pub fn report_metadata_lines(metadata: &CaptureMetadata) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Some(at) = &metadata.captured_at {
        lines.push(format!("Date: {}", format_date(at)));
    }
    lines.push(location_line(metadata));
    lines
}

fn non_empty_address(metadata: &CaptureMetadata) -> Option<&str> {
    metadata
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
}
