//! The session workflow.
//!
//! [`Workflow`] is the single owner of the per-stop photo store, the session
//! ledger, the watermark and the metadata toggle. Every state change goes
//! through it, behind the [`AuthGate`]:
//!
//! ```text
//! login → start_session → (capture_photo | add_photo)* → save_stop → ... → close_session
//! ```
//!
//! Saving and closing are all-or-nothing. A stop whose collage fails to
//! compose keeps its photos; a session whose document fails to export keeps
//! its reports. Only after the PDF bytes exist are the ledger and store
//! cleared and the gate logged out.

use crate::auth::AuthGate;
use crate::capture::{Capture, CaptureError};
use crate::collage::{CollageError, CollageSettings, compose};
use crate::config::ReportConfig;
use crate::export::{ExportError, ExportedDocument, PageLayout, export_document};
use crate::imaging::{FontError, FontFace};
use crate::location::Locator;
use crate::metadata::resolve_metadata;
use crate::naming::{document_file_name, report_file_name};
use crate::session::SessionLedger;
use crate::store::PhotoStore;
use crate::types::{PhotoRecord, Report};
use crate::watermark::{WatermarkError, WatermarkState};
use chrono::NaiveDateTime;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Incorrect password")]
    LoginRejected,
    #[error("Collage error: {0}")]
    Collage(#[from] CollageError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Watermark error: {0}")]
    Watermark(#[from] WatermarkError),
    #[error("Font error: {0}")]
    Font(#[from] FontError),
}

pub struct Workflow {
    auth: AuthGate,
    store: PhotoStore,
    ledger: SessionLedger,
    watermark: WatermarkState,
    include_metadata: bool,
    settings: CollageSettings,
    layout: PageLayout,
    font: FontFace,
    document_name: String,
}

impl Workflow {
    /// Build a workflow from a validated config, loading the caption font it
    /// names (or the bundled one).
    pub fn from_config(config: &ReportConfig) -> Result<Self, WorkflowError> {
        let font = FontFace::from_config(&config.font)?;
        Self::with_font(config, font)
    }

    pub fn with_font(config: &ReportConfig, font: FontFace) -> Result<Self, WorkflowError> {
        Ok(Self {
            auth: AuthGate::new(config.auth.secret.clone()),
            store: PhotoStore::new(),
            ledger: SessionLedger::new(),
            watermark: WatermarkState::new(),
            include_metadata: true,
            settings: CollageSettings::from_config(config)?,
            layout: PageLayout::from_config(&config.export),
            font,
            document_name: document_file_name(&config.export.filename),
        })
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    pub fn login(&mut self, attempt: &str) -> bool {
        self.auth.login(attempt)
    }

    pub fn logout(&mut self) {
        self.auth.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Unlock with `attempt` and begin with an empty store and ledger.
    pub fn start_session(&mut self, attempt: &str) -> Result<(), WorkflowError> {
        if !self.auth.login(attempt) {
            return Err(WorkflowError::LoginRejected);
        }
        self.store.clear();
        self.ledger.clear();
        info!("Session started");
        Ok(())
    }

    /// Export every saved report into one document, then reset the session
    /// and log out.
    ///
    /// Nothing is cleared when the export fails.
    pub fn close_session(&mut self) -> Result<ExportedDocument, WorkflowError> {
        self.require_auth()?;
        let document = export_document(self.ledger.reports(), &self.layout, &self.document_name)?;
        info!(
            "Session closed: {} report(s) on {} page(s)",
            self.ledger.count(),
            document.page_count
        );
        self.ledger.clear();
        self.store.clear();
        self.auth.logout();
        Ok(document)
    }

    // ------------------------------------------------------------------
    // Current stop
    // ------------------------------------------------------------------

    /// Grab a frame from `camera` and stamp it with the time and whatever
    /// `locator` can tell about the position.
    pub fn capture_photo(
        &mut self,
        camera: &mut impl Capture,
        locator: &mut impl Locator,
        stop_label: &str,
        captured_at: NaiveDateTime,
    ) -> Result<&PhotoRecord, WorkflowError> {
        self.require_auth()?;
        let frame = camera.grab_frame()?;
        let metadata = resolve_metadata(captured_at, stop_label, locator);
        Ok(self.store.append(PhotoRecord::new(frame, metadata)))
    }

    /// Add an already-stamped photo to the current stop. Returns the number
    /// of photos now waiting.
    pub fn add_photo(&mut self, photo: PhotoRecord) -> Result<usize, WorkflowError> {
        self.require_auth()?;
        self.store.append(photo);
        Ok(self.store.count())
    }

    /// Drop the current stop's photos without saving.
    pub fn discard_photos(&mut self) -> Result<(), WorkflowError> {
        self.require_auth()?;
        self.store.clear();
        Ok(())
    }

    /// Compose the current stop into a report and add it to the ledger.
    ///
    /// The report carries the first photo's metadata. The store is cleared
    /// only once the report is in the ledger.
    pub fn save_stop(&mut self, provided_id: Option<&str>) -> Result<Report, WorkflowError> {
        self.require_auth()?;
        let photos = self.store.as_slice();
        let Some(first) = photos.first() else {
            return Err(CollageError::NoPhotos.into());
        };
        let metadata = first.metadata.clone();
        let image = compose(
            photos,
            self.watermark.get(),
            self.include_metadata,
            &self.settings,
            &self.font,
        )?;
        let report = self.ledger.add_report(image, metadata, provided_id);
        self.store.clear();
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn set_include_metadata(&mut self, include: bool) {
        self.include_metadata = include;
    }

    pub fn include_metadata(&self) -> bool {
        self.include_metadata
    }

    /// Replace the watermark with a PNG. A rejected file leaves no watermark.
    pub fn set_watermark_png(&mut self, bytes: &[u8]) -> Result<(), WorkflowError> {
        Ok(self.watermark.set_png(bytes)?)
    }

    pub fn load_watermark(&mut self, path: &Path) -> Result<(), WorkflowError> {
        Ok(self.watermark.load(path)?)
    }

    pub fn clear_watermark(&mut self) {
        self.watermark.clear();
    }

    pub fn has_watermark(&self) -> bool {
        self.watermark.is_set()
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn photo_count(&self) -> usize {
        self.store.count()
    }

    pub fn reports(&self) -> &[Report] {
        self.ledger.reports()
    }

    pub fn next_auto_label(&self) -> String {
        self.ledger.next_auto_label()
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    fn require_auth(&self) -> Result<(), WorkflowError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(WorkflowError::NotAuthenticated)
        }
    }
}

/// Write one report's JPEG into `dir` as `{sanitized id}.jpg`.
pub fn save_report_image(report: &Report, dir: &Path) -> Result<PathBuf, std::io::Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&report.id));
    std::fs::write(&path, &report.image.bytes)?;
    info!("Saved {}", path.display());
    Ok(path)
}

/// Write an exported document into `dir` under its own file name.
pub fn save_document(document: &ExportedDocument, dir: &Path) -> Result<PathBuf, std::io::Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&document.filename);
    std::fs::write(&path, &document.bytes)?;
    info!("Saved {}", path.display());
    Ok(path)
}
