//! Caption text fitting.
//!
//! Two steps, deliberately different in how they measure:
//!
//! 1. **Wrap**: [`wrap_words`] breaks an address into lines by character
//!    count, independent of the font.
//! 2. **Fit**: [`fit_font_size`] measures every line with real glyph
//!    advances and shrinks the font until the longest line fits, stopping at
//!    a minimum size.
//!
//! Measurement goes through the [`TextMeasure`] trait so the fitting math can
//! be tested with a fixed-advance measurer instead of a real font.

use crate::config::FontConfig;
use rusttype::{Font, Scale, point};
use std::path::Path;
use thiserror::Error;

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a usable TrueType font: {0}")]
    Invalid(String),
}

/// Width of a single line of text at a given font size, in pixels.
pub trait TextMeasure {
    fn line_width(&self, text: &str, font_size: f32) -> f32;
}

/// A loaded TrueType face.
///
/// Font sizes are em sizes, the way CSS `20px` means a 20px em box.
#[derive(Clone)]
pub struct FontFace {
    font: Font<'static>,
    name: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace").field("name", &self.name).finish()
    }
}

impl FontFace {
    /// The DejaVu Sans face compiled into the binary.
    pub fn bundled() -> Result<Self, FontError> {
        let font = Font::try_from_bytes(BUNDLED_FONT)
            .ok_or_else(|| FontError::Invalid("bundled DejaVu Sans".into()))?;
        Ok(Self {
            font,
            name: "DejaVu Sans".into(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| FontError::Invalid(path.display().to_string()))?;
        Ok(Self {
            font,
            name: path.display().to_string(),
        })
    }

    /// The configured face, or the bundled one when none is configured.
    pub fn from_config(config: &FontConfig) -> Result<Self, FontError> {
        match &config.path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    /// rusttype scale whose em box is `font_size` pixels tall.
    pub fn em_scale(&self, font_size: f32) -> Scale {
        let units_per_em = self.font.units_per_em().max(1) as f32;
        let vm = self.font.v_metrics_unscaled();
        Scale::uniform(font_size * (vm.ascent - vm.descent) / units_per_em)
    }
}

impl TextMeasure for FontFace {
    fn line_width(&self, text: &str, font_size: f32) -> f32 {
        self.font
            .layout(text, self.em_scale(font_size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

/// Greedy word wrap by character count.
///
/// A word joins the current line while the line plus the word stays within
/// `max_chars`, or when the line is still empty (a single long word is never
/// split).
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = current.chars().count() + word.chars().count();
        if candidate > max_chars && !current.is_empty() {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
        current.push_str(word);
        current.push(' ');
    }
    lines.push(current.trim_end().to_string());
    lines
}

/// Pick the font size that makes the longest line fit `max_width`.
///
/// Text that already fits at `start_size` keeps it. Otherwise the size is
/// scaled by `max_width / longest`, floored to a whole pixel and clamped to
/// `min_size`. The result never exceeds `start_size`.
pub fn fit_font_size(
    lines: &[String],
    max_width: f32,
    start_size: f32,
    min_size: f32,
    measure: &impl TextMeasure,
) -> f32 {
    let longest = lines
        .iter()
        .map(|line| measure.line_width(line, start_size))
        .fold(0.0_f32, f32::max);

    if longest <= max_width {
        return start_size;
    }

    let floor = min_size.min(start_size);
    (start_size * (max_width / longest)).floor().max(floor)
}

/// Lines of text with the font size they fit at.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub font_size: f32,
    /// Distance between successive line tops.
    pub line_height: f32,
}

impl FittedText {
    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Top y of every line when the block starts at `top`.
    pub fn line_tops(&self, top: f64) -> Vec<f64> {
        (0..self.lines.len())
            .map(|i| top + i as f64 * self.line_height as f64)
            .collect()
    }
}

/// Split `text` on hard line breaks and fit it to `max_width`.
///
/// Lines are not re-wrapped here; callers wrap the parts that should wrap
/// (the address) before joining.
pub fn fit_text(
    text: &str,
    max_width: f32,
    start_size: f32,
    min_size: f32,
    line_height_factor: f32,
    measure: &impl TextMeasure,
) -> FittedText {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let font_size = fit_font_size(&lines, max_width, start_size, min_size, measure);
    FittedText {
        lines,
        font_size,
        line_height: font_size * line_height_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::FixedAdvance;

    // =========================================================================
    // wrap_words
    // =========================================================================

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap_words("Calle Mayor 5", 35), vec!["Calle Mayor 5"]);
    }

    #[test]
    fn wrap_breaks_before_exceeding_limit() {
        let address = "Avenida de la Constitución, 12, Centro, Sevilla, Andalucía, España";
        let lines = wrap_words(address, 35);
        assert_eq!(
            lines,
            vec![
                "Avenida de la Constitución, 12,",
                "Centro, Sevilla, Andalucía, España",
            ]
        );
        for line in &lines {
            assert!(line.chars().count() <= 35, "{line}");
        }
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        // 10 two-byte characters plus a space and a word still fit in 16 chars
        let lines = wrap_words("ññññññññññ abcd", 16);
        assert_eq!(lines, vec!["ññññññññññ abcd"]);
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let lines = wrap_words("x Supercalifragilisticexpialidocious y", 10);
        assert_eq!(lines, vec!["x", "Supercalifragilisticexpialidocious", "y"]);
    }

    #[test]
    fn wrap_empty_text_yields_single_empty_line() {
        assert_eq!(wrap_words("", 35), vec![String::new()]);
    }

    // =========================================================================
    // fit_font_size
    // =========================================================================

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fitting_text_keeps_start_size() {
        let measure = FixedAdvance(0.5);
        // 10 chars * 20px * 0.5 = 100px
        let size = fit_font_size(&lines(&["0123456789"]), 100.0, 20.0, 10.0, &measure);
        assert_eq!(size, 20.0);
    }

    #[test]
    fn overflowing_text_scales_by_ratio_and_floors() {
        let measure = FixedAdvance(0.5);
        // 30 chars at 20px → 300px, limit 250 → 20 * 250/300 = 16.67 → 16
        let size = fit_font_size(&lines(&["a", &"b".repeat(30)]), 250.0, 20.0, 10.0, &measure);
        assert_eq!(size, 16.0);
    }

    #[test]
    fn shrinking_stops_at_minimum() {
        let measure = FixedAdvance(0.5);
        let size = fit_font_size(&lines(&[&"w".repeat(200)]), 100.0, 20.0, 10.0, &measure);
        assert_eq!(size, 10.0);
    }

    #[test]
    fn font_size_is_monotone_in_max_width() {
        let measure = FixedAdvance(0.55);
        let text = lines(&["ID: Stop 12", "Date: 16/10/2026, 14:05", &"z".repeat(90)]);
        let mut previous = f32::INFINITY;
        for width in (0..=1200).rev().step_by(7) {
            let size = fit_font_size(&text, width as f32, 20.0, 10.0, &measure);
            assert!(size <= previous, "width {width}: {size} > {previous}");
            assert!(size >= 10.0);
            previous = size;
        }
    }

    #[test]
    fn start_below_minimum_never_grows() {
        let measure = FixedAdvance(0.5);
        let size = fit_font_size(&lines(&[&"w".repeat(200)]), 10.0, 8.0, 10.0, &measure);
        assert_eq!(size, 8.0);
    }

    // =========================================================================
    // fit_text + real font
    // =========================================================================

    #[test]
    fn fit_text_splits_on_hard_breaks() {
        let measure = FixedAdvance(0.5);
        let fitted = fit_text("ID: A\nDate: x", 1000.0, 20.0, 10.0, 1.2, &measure);
        assert_eq!(fitted.lines, vec!["ID: A", "Date: x"]);
        assert_eq!(fitted.font_size, 20.0);
        assert!((fitted.block_height() - 48.0).abs() < 1e-4);
        let tops = fitted.line_tops(100.0);
        assert!((tops[1] - 124.0).abs() < 1e-4);
    }

    #[test]
    fn bundled_font_measures_longer_text_wider() {
        let face = FontFace::bundled().unwrap();
        let short = face.line_width("Stop 1", 20.0);
        let long = face.line_width("Stop 1, Calle Mayor 5, Madrid", 20.0);
        assert!(short > 0.0);
        assert!(long > short);
        // doubling the size roughly doubles the width
        let doubled = face.line_width("Stop 1", 40.0);
        assert!((doubled / short - 2.0).abs() < 0.05, "{doubled} vs {short}");
    }

    #[test]
    fn bundled_font_empty_line_is_zero_width() {
        let face = FontFace::bundled().unwrap();
        assert_eq!(face.line_width("", 20.0), 0.0);
    }

    #[test]
    fn from_file_rejects_garbage() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            FontFace::from_file(&path),
            Err(FontError::Invalid(_))
        ));
    }
}
