//! CLI output formatting.
//!
//! Output is organized by stop, not by file: each saved report leads with its
//! position and id, and the metadata that went into its caption follows as
//! indented context. File paths appear only as `Saved:` lines.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Stops
//! 001 Stop 1 (2 photos)
//!     Label: Dock 4
//!     Date: 7/3/2026, 09:05
//!     Location: Av. Providencia 1234, Santiago
//!     Saved: out/Stop_1.jpg
//! 002 Cliente 12 (1 photo)
//!     Location: not available
//!
//! Document
//!     delivery_journey_report.pdf (2 pages, 2 reports)
//!     Saved: out/delivery_journey_report.pdf
//! ```
//!
//! ## Compose
//!
//! ```text
//! Stop 1 (3 photos)
//!     1200x900 JPEG, 181 KB
//!     Saved: out/Stop_1.jpg
//! ```
//!
//! # Architecture
//!
//! Every command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! do no I/O.

use crate::export::ExportedDocument;
use crate::metadata::report_metadata_lines;
use crate::types::Report;
use std::path::{Path, PathBuf};

/// Longest label shown before it is cut.
const MAX_LABEL_CHARS: usize = 60;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Format a stop header: positional index + report id + photo count.
///
/// ```text
/// 001 Stop 1 (2 photos)
/// ```
fn stop_header(index: usize, id: &str, photos: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        id,
        plural(photos, "photo", "photos")
    )
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// File size in the largest unit that keeps the number readable.
fn human_size(bytes: usize) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{} KB", b / 1024),
        b => format!("{b} B"),
    }
}

// ============================================================================
// Run output
// ============================================================================

/// One saved stop as shown after a run.
#[derive(Debug, Clone)]
pub struct StopOutcome {
    pub report: Report,
    pub photo_count: usize,
    pub saved: Option<PathBuf>,
}

/// Format one stop: header, label, caption metadata, and saved path.
pub fn format_stop(index: usize, stop: &StopOutcome) -> Vec<String> {
    let mut lines = vec![stop_header(index, &stop.report.id, stop.photo_count)];
    let label = stop.report.metadata.stop_label.trim();
    if !label.is_empty() {
        lines.push(format!(
            "{}Label: {}",
            indent(1),
            truncate_label(label, MAX_LABEL_CHARS)
        ));
    }
    for line in report_metadata_lines(&stop.report.metadata) {
        lines.push(format!("{}{}", indent(1), line));
    }
    if let Some(path) = &stop.saved {
        lines.push(format!("{}Saved: {}", indent(1), path.display()));
    }
    lines
}

/// Format the exported document block.
pub fn format_document(document: &ExportedDocument, report_count: usize, path: &Path) -> Vec<String> {
    vec![
        "Document".to_string(),
        format!(
            "{}{} ({}, {})",
            indent(1),
            document.filename,
            plural(document.page_count, "page", "pages"),
            plural(report_count, "report", "reports")
        ),
        format!("{}Saved: {}", indent(1), path.display()),
    ]
}

/// Format a full run: every stop, then the document.
pub fn format_run_output(stops: &[StopOutcome], document: &ExportedDocument, path: &Path) -> Vec<String> {
    let mut lines = vec!["Stops".to_string()];
    for (i, stop) in stops.iter().enumerate() {
        lines.extend(format_stop(i + 1, stop));
    }
    lines.push(String::new());
    lines.extend(format_document(document, stops.len(), path));
    lines
}

/// Print run output to stdout.
pub fn print_run_output(stops: &[StopOutcome], document: &ExportedDocument, path: &Path) {
    for line in format_run_output(stops, document, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Compose output
// ============================================================================

/// Format a single composed report.
pub fn format_compose_output(report: &Report, photo_count: usize, path: &Path) -> Vec<String> {
    vec![
        format!(
            "{} ({})",
            report.id,
            plural(photo_count, "photo", "photos")
        ),
        format!(
            "{}{}x{} JPEG, {}",
            indent(1),
            report.image.width,
            report.image.height,
            human_size(report.image.bytes.len())
        ),
        format!("{}Saved: {}", indent(1), path.display()),
    ]
}

/// Print compose output to stdout.
pub fn print_compose_output(report: &Report, photo_count: usize, path: &Path) {
    for line in format_compose_output(report, photo_count, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
