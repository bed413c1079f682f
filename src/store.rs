//! Photos captured for the stop in progress.

use crate::types::PhotoRecord;
use log::debug;

/// Ordered, append-only list of photos for one delivery stop.
///
/// Insertion order is grid order: the first photo lands top-left and its
/// metadata becomes the report's metadata.
#[derive(Debug, Default)]
pub struct PhotoStore {
    photos: Vec<PhotoRecord>,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `photo` and return the stored record.
    pub fn append(&mut self, photo: PhotoRecord) -> &PhotoRecord {
        let index = self.photos.len();
        self.photos.push(photo);
        debug!("Photo stored ({} for this stop)", self.photos.len());
        &self.photos[index]
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn count(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn first(&self) -> Option<&PhotoRecord> {
        self.photos.first()
    }

    pub fn last(&self) -> Option<&PhotoRecord> {
        self.photos.last()
    }

    pub fn as_slice(&self) -> &[PhotoRecord] {
        &self.photos
    }
}
