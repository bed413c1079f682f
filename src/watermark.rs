//! Session-wide watermark image.
//!
//! Only PNG files are accepted, since a watermark without an alpha channel
//! would blank out the photos under it. A rejected load clears whatever
//! watermark was set before, so a failed replace never leaves a stale mark.

use crate::imaging::decode_image;
use image::{ImageFormat, RgbaImage};
use log::{info, warn};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Watermark must be a PNG image")]
    NotPng,
    #[error("Watermark image could not be decoded: {0}")]
    Decode(String),
}

/// The optional watermark composited onto every collage.
#[derive(Debug, Default, Clone)]
pub struct WatermarkState {
    image: Option<RgbaImage>,
}

impl WatermarkState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the watermark with a PNG from memory.
    ///
    /// On error the state is left empty.
    pub fn set_png(&mut self, bytes: &[u8]) -> Result<(), WatermarkError> {
        self.image = None;
        if image::guess_format(bytes).ok() != Some(ImageFormat::Png) {
            warn!("Rejected watermark: not a PNG");
            return Err(WatermarkError::NotPng);
        }
        let decoded = decode_image(bytes).map_err(|e| {
            warn!("Rejected watermark: {e}");
            WatermarkError::Decode(e.to_string())
        })?;
        let rgba = decoded.into_rgba8();
        info!("Watermark set ({}x{})", rgba.width(), rgba.height());
        self.image = Some(rgba);
        Ok(())
    }

    /// Replace the watermark with a PNG file.
    pub fn load(&mut self, path: &Path) -> Result<(), WatermarkError> {
        match std::fs::read(path) {
            Ok(bytes) => self.set_png(&bytes),
            Err(e) => {
                self.image = None;
                Err(e.into())
            }
        }
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    pub fn get(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, png_bytes, solid_image, solid_rgba};
    use image::Rgba;

    fn mark() -> Vec<u8> {
        png_bytes(&solid_rgba(40, 20, Rgba([10, 20, 30, 200])))
    }

    #[test]
    fn png_is_accepted() {
        let mut state = WatermarkState::new();
        assert!(!state.is_set());
        state.set_png(&mark()).unwrap();
        let img = state.get().unwrap();
        assert_eq!(img.dimensions(), (40, 20));
        assert_eq!(*img.get_pixel(0, 0), Rgba([10, 20, 30, 200]));
    }

    #[test]
    fn jpeg_is_rejected_and_clears_previous() {
        let mut state = WatermarkState::new();
        state.set_png(&mark()).unwrap();
        let result = state.set_png(&jpeg_bytes(&solid_image(8, 8, [0, 0, 0])));
        assert!(matches!(result, Err(WatermarkError::NotPng)));
        assert!(!state.is_set());
    }

    #[test]
    fn truncated_png_is_rejected() {
        let mut state = WatermarkState::new();
        let bytes = mark();
        let result = state.set_png(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(WatermarkError::Decode(_))));
        assert!(state.get().is_none());
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logo.png");
        std::fs::write(&path, mark()).unwrap();

        let mut state = WatermarkState::new();
        state.load(&path).unwrap();
        assert!(state.is_set());

        let result = state.load(&tmp.path().join("missing.png"));
        assert!(matches!(result, Err(WatermarkError::Io(_))));
        assert!(!state.is_set());
    }

    #[test]
    fn clear_removes_watermark() {
        let mut state = WatermarkState::new();
        state.set_png(&mark()).unwrap();
        state.clear();
        assert!(!state.is_set());
    }
}
