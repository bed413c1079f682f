//! The session ledger: every report saved since the session started.
//!
//! Reports without a user-supplied id are named `Stop 1`, `Stop 2`, ... The
//! counter only advances when it is used, so custom ids leave no gaps:
//! `Stop 1`, `Customer A`, `Stop 2`.

use crate::types::{CaptureMetadata, Report, ReportImage};
use log::info;

/// Ordered list of finalized reports plus the auto-numbering counter.
#[derive(Debug)]
pub struct SessionLedger {
    reports: Vec<Report>,
    next_stop: u32,
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLedger {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            next_stop: 1,
        }
    }

    /// Append a report and return it.
    ///
    /// A `provided_id` that is non-empty after trimming is used (trimmed).
    /// Otherwise the report is named by [`next_auto_label`](Self::next_auto_label)
    /// and the counter advances. Ids are not checked for uniqueness.
    pub fn add_report(
        &mut self,
        image: ReportImage,
        metadata: CaptureMetadata,
        provided_id: Option<&str>,
    ) -> Report {
        let id = match provided_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let id = self.next_auto_label();
                self.next_stop += 1;
                id
            }
        };

        let report = Report {
            id,
            image,
            metadata,
        };
        self.reports.push(report.clone());
        info!(
            "Report \"{}\" saved ({} in session)",
            report.id,
            self.reports.len()
        );
        report
    }

    /// Snapshot of all reports in insertion order.
    ///
    /// The returned vector is independent of the ledger; the JPEG buffers
    /// inside are shared.
    pub fn list_reports(&self) -> Vec<Report> {
        self.reports.clone()
    }

    /// Borrowed view, for callers that only read.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Drop every report and restart numbering at 1.
    pub fn clear(&mut self) {
        self.reports.clear();
        self.next_stop = 1;
    }

    pub fn count(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn next_stop_number(&self) -> u32 {
        self.next_stop
    }

    /// The id the next report gets when none is provided.
    pub fn next_auto_label(&self) -> String {
        format!("Stop {}", self.next_stop)
    }
}
