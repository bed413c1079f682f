//! Camera collaborator.
//!
//! [`Capture`] is the boundary to whatever produces frames: a real camera
//! driver, or [`FileCapture`], which replays image files and backs the CLI.
//! Errors are reported in the camera's own terms ([`CaptureError`]) so the
//! caller can show a message without knowing the platform.

use crate::imaging::{BackendError, load_image};
use image::DynamicImage;
use log::{debug, info};
use std::collections::VecDeque;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("No camera found{}", .0.as_deref().map(|id| format!(" with id {id}")).unwrap_or_default())]
    NotFound(Option<String>),
    #[error("Camera is in use or cannot be read")]
    Busy,
    #[error("Camera operation was aborted")]
    Aborted,
    #[error("Camera cannot satisfy the requested constraints")]
    Overconstrained,
    #[error("Camera is not active")]
    NotActive,
    #[error("No more frames to capture")]
    Exhausted,
    #[error("Frame could not be read: {0}")]
    Frame(#[from] BackendError),
    #[error("Unknown camera error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Map a platform media error name (`NotAllowedError`, `NotReadableError`,
    /// ...) to a capture error.
    pub fn from_platform(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => Self::NotFound(None),
            "NotReadableError" | "TrackStartError" => Self::Busy,
            "AbortError" => Self::Aborted,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => Self::Overconstrained,
            _ => Self::Unknown(format!("{name}: {message}")),
        }
    }
}

/// A video input the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub label: String,
}

/// Source of photo frames.
pub trait Capture {
    fn list_devices(&mut self) -> Result<Vec<Device>, CaptureError>;

    /// Start streaming from `device_id`, or the default device when `None`.
    /// Returns the id of the device actually started.
    fn start(&mut self, device_id: Option<&str>) -> Result<String, CaptureError>;

    fn stop(&mut self);

    fn is_active(&self) -> bool;

    fn grab_frame(&mut self) -> Result<DynamicImage, CaptureError>;
}

/// The device to start: `preferred` if it is connected, else the first one.
pub fn choose_device<'a>(devices: &'a [Device], preferred: Option<&str>) -> Option<&'a Device> {
    preferred
        .and_then(|id| devices.iter().find(|d| d.id == id))
        .or_else(|| devices.first())
}

/// Replays image files as camera frames, in order.
#[derive(Debug)]
pub struct FileCapture {
    device: Device,
    frames: VecDeque<PathBuf>,
    active: bool,
}

impl FileCapture {
    pub const DEVICE_ID: &'static str = "file";

    pub fn new(frames: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            device: Device {
                id: Self::DEVICE_ID.to_string(),
                label: "Image files".to_string(),
            },
            frames: frames.into_iter().collect(),
            active: false,
        }
    }

    /// Queue more frames behind the ones already waiting.
    pub fn enqueue(&mut self, frames: impl IntoIterator<Item = PathBuf>) {
        self.frames.extend(frames);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Capture for FileCapture {
    fn list_devices(&mut self) -> Result<Vec<Device>, CaptureError> {
        Ok(vec![self.device.clone()])
    }

    fn start(&mut self, device_id: Option<&str>) -> Result<String, CaptureError> {
        match device_id {
            Some(id) if id != self.device.id => Err(CaptureError::NotFound(Some(id.to_string()))),
            _ => {
                self.active = true;
                info!("Capture started on {}", self.device.label);
                Ok(self.device.id.clone())
            }
        }
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn grab_frame(&mut self) -> Result<DynamicImage, CaptureError> {
        if !self.active {
            return Err(CaptureError::NotActive);
        }
        let path = self.frames.pop_front().ok_or(CaptureError::Exhausted)?;
        debug!("Capturing frame from {}", path.display());
        Ok(load_image(&path)?)
    }
}
