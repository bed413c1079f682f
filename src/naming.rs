//! File names for exported artifacts.
//!
//! Report ids are typed by people in the field (`Stop 3`, `Cliente Pérez`,
//! `A/17`), so they are reduced to a portable stem before becoming a file
//! name:
//! - `"Stop 3"` → `Stop_3.jpg`
//! - `"Cliente Pérez"` → `Cliente_Pérez.jpg`
//! - `"A/17"` → `A_17.jpg`
//! - `"   "` → `report.jpg`

/// Stem used when an id has no usable characters.
const FALLBACK_STEM: &str = "report";

/// Reduce `id` to letters, digits, `-` and `_`.
///
/// Every run of other characters becomes a single `_`; leading and trailing
/// underscores are dropped.
pub fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    let mut pending_sep = false;
    for ch in id.chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            if pending_sep && !stem.is_empty() {
                stem.push('_');
            }
            pending_sep = false;
            stem.push(ch);
        } else {
            pending_sep = true;
        }
    }
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// File name for a single report image.
pub fn report_file_name(id: &str) -> String {
    format!("{}.jpg", file_stem(id))
}

/// Ensure a document file name ends in `.pdf`.
pub fn document_file_name(name: &str) -> String {
    let name = name.trim();
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}
