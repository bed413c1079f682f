//! Report configuration module.
//!
//! Handles loading, validating, and merging a `config.toml` file. The file is
//! sparse: stock defaults are serialized to a TOML table first, the user file
//! is merged on top, and the merged table is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [collage]
//! width = 1200              # Output canvas width in pixels
//! height = 900              # Output canvas height in pixels
//! caption_band = 80         # Height of the metadata strip at the bottom
//! quality = 95              # JPEG quality (1-100)
//!
//! [caption]
//! font_size = 20.0          # Starting font size before shrink-to-fit
//! min_font_size = 10.0      # Shrinking stops here, text may overflow
//! max_chars_per_line = 35   # Greedy address wrap width
//! side_padding = 20         # Horizontal padding on each side of the caption
//! line_height = 1.2         # Line height as a multiple of the font size
//!
//! [watermark]
//! width_fraction = 0.2      # Watermark width relative to the canvas width
//! opacity = 0.5
//!
//! [colors]
//! photo_background = "#ffffff"
//! caption_background = "#f0f0f0"
//! caption_text = "#333333"
//!
//! [export]
//! page_width = 595.28       # A4 in points
//! page_height = 841.89
//! margin = 20.0
//! filename = "delivery_journey_report.pdf"
//!
//! [auth]
//! secret = "..."            # Shared password; omit for an open gate
//!
//! [font]
//! path = "fonts/Caption.ttf" # Replace the bundled DejaVu Sans
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration for composing and exporting reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Output canvas geometry and encoding.
    pub collage: CollageConfig,
    /// Caption band text fitting.
    pub caption: CaptionConfig,
    /// Watermark scale and opacity.
    pub watermark: WatermarkConfig,
    /// Background and text colors of the composite.
    pub colors: ColorConfig,
    /// PDF page geometry and output naming.
    pub export: ExportConfig,
    /// Shared-secret gate.
    pub auth: AuthConfig,
    /// Caption font override.
    pub font: FontConfig,
}

impl ReportConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.collage;
        if c.width == 0 || c.height == 0 {
            return Err(ConfigError::Validation(
                "collage.width and collage.height must be non-zero".into(),
            ));
        }
        if c.caption_band >= c.height {
            return Err(ConfigError::Validation(
                "collage.caption_band must be smaller than collage.height".into(),
            ));
        }
        if !(1..=100).contains(&c.quality) {
            return Err(ConfigError::Validation(
                "collage.quality must be 1-100".into(),
            ));
        }
        let cap = &self.caption;
        if cap.min_font_size <= 0.0 || cap.min_font_size > cap.font_size {
            return Err(ConfigError::Validation(
                "caption.min_font_size must be positive and not exceed caption.font_size".into(),
            ));
        }
        if cap.max_chars_per_line == 0 {
            return Err(ConfigError::Validation(
                "caption.max_chars_per_line must be non-zero".into(),
            ));
        }
        if cap.side_padding.saturating_mul(2) >= c.width {
            return Err(ConfigError::Validation(
                "caption.side_padding leaves no room for text".into(),
            ));
        }
        if cap.line_height <= 0.0 {
            return Err(ConfigError::Validation(
                "caption.line_height must be positive".into(),
            ));
        }
        let wm = &self.watermark;
        if !(wm.width_fraction > 0.0 && wm.width_fraction <= 1.0) {
            return Err(ConfigError::Validation(
                "watermark.width_fraction must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&wm.opacity) {
            return Err(ConfigError::Validation(
                "watermark.opacity must be 0-1".into(),
            ));
        }
        for (key, value) in [
            ("colors.photo_background", &self.colors.photo_background),
            ("colors.caption_background", &self.colors.caption_background),
            ("colors.caption_text", &self.colors.caption_text),
        ] {
            parse_hex_color(value)
                .map_err(|e| ConfigError::Validation(format!("{key}: {e}")))?;
        }
        let ex = &self.export;
        if ex.margin < 0.0 || ex.margin * 2.0 >= ex.page_width.min(ex.page_height) {
            return Err(ConfigError::Validation(
                "export.margin must leave room on the page".into(),
            ));
        }
        if ex.filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.filename must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Output canvas geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageConfig {
    pub width: u32,
    pub height: u32,
    /// Height of the metadata strip; the photo area is everything above it.
    pub caption_band: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u8,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            caption_band: 80,
            quality: 95,
        }
    }
}

/// Caption text fitting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    pub font_size: f32,
    pub min_font_size: f32,
    /// Greedy word-wrap width for the address, in characters.
    pub max_chars_per_line: usize,
    pub side_padding: u32,
    pub line_height: f32,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            min_font_size: 10.0,
            max_chars_per_line: 35,
            side_padding: 20,
            line_height: 1.2,
        }
    }
}

/// Watermark scale and opacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    pub width_fraction: f32,
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            width_fraction: 0.2,
            opacity: 0.5,
        }
    }
}

/// Composite colors as `#rrggbb` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub photo_background: String,
    pub caption_background: String,
    pub caption_text: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            photo_background: "#ffffff".to_string(),
            caption_background: "#f0f0f0".to_string(),
            caption_text: "#333333".to_string(),
        }
    }
}

/// PDF page geometry, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// File name of the session document.
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 20.0,
            filename: "delivery_journey_report.pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// TrueType file used for captions instead of the bundled face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Parse `#rrggbb` (or `#rrggbbaa`) into RGBA bytes.
pub fn parse_hex_color(value: &str) -> Result<[u8; 4], String> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| format!("'{value}' must start with '#'"))?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(format!("'{value}' must be #rrggbb or #rrggbbaa"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("'{value}' is not valid hex"))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ReportConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ReportConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ReportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when it
/// does not exist.
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# delivery-collage configuration
# All keys are optional; the values below are the built-in defaults.

[collage]
# Output canvas size in pixels.
width = 1200
height = 900
# Height of the light-gray metadata strip at the bottom of every report.
caption_band = 80
# JPEG quality of the composed report (1-100).
quality = 95

[caption]
# The caption starts at this size and shrinks until the longest line fits.
font_size = 20.0
# Shrinking never goes below this size; longer lines overflow instead.
min_font_size = 10.0
# Addresses are word-wrapped at this many characters.
max_chars_per_line = 35
# Padding left and right of the caption text, in pixels.
side_padding = 20
# Line height as a multiple of the font size.
line_height = 1.2

[watermark]
# Watermark width relative to the canvas width. Height follows the aspect ratio.
width_fraction = 0.2
opacity = 0.5

[colors]
photo_background = "#ffffff"
caption_background = "#f0f0f0"
caption_text = "#333333"

[export]
# Page size in points (A4).
page_width = 595.28
page_height = 841.89
margin = 20.0
filename = "delivery_journey_report.pdf"

[auth]
# Shared password required before any capture. Leave unset for an open gate.
# secret = "change-me"

[font]
# TrueType face for captions. Defaults to the bundled DejaVu Sans.
# path = "fonts/Caption.ttf"
"##
}
