//! Session plans: a file describing a whole day of stops, replayed by the CLI.
//!
//! ```toml
//! watermark = "logo.png"
//! include_metadata = true
//!
//! [[stops]]
//! id = "Cliente 12"                 # optional; "Stop N" otherwise
//! label = "Dock 4"
//! captured_at = "2026-03-07T09:05:00"
//! location = { latitude = -33.4489, longitude = -70.6693, address = "Av. Providencia 1234" }
//! photos = ["stop1/front.jpg", "stop1/parcel.jpg"]
//! ```
//!
//! The same structure is accepted as JSON when the file ends in `.json`.
//! Relative paths are resolved against the plan's directory.

use crate::location::FixedLocator;
use crate::types::Coordinates;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Plan has no stops")]
    NoStops,
    #[error("Stop {0} has no photos")]
    EmptyStop(usize),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionPlan {
    /// PNG overlaid on every collage.
    #[serde(default)]
    pub watermark: Option<PathBuf>,
    #[serde(default = "default_include_metadata")]
    pub include_metadata: bool,
    pub stops: Vec<StopPlan>,
}

fn default_include_metadata() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopPlan {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    /// Capture time for every photo of the stop; the run's clock otherwise.
    #[serde(default)]
    pub captured_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<LocationPlan>,
    pub photos: Vec<PathBuf>,
}

impl StopPlan {
    /// The locator that answers for this stop.
    pub fn locator(&self) -> FixedLocator {
        match &self.location {
            Some(location) => FixedLocator::new(
                Some(Coordinates::new(location.latitude, location.longitude)),
                location.address.clone(),
            ),
            None => FixedLocator::unavailable(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationPlan {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

impl SessionPlan {
    pub fn parse_toml(content: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(content)?)
    }

    pub fn parse_json(content: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.stops.is_empty() {
            return Err(PlanError::NoStops);
        }
        if let Some(index) = self.stops.iter().position(|s| s.photos.is_empty()) {
            return Err(PlanError::EmptyStop(index + 1));
        }
        Ok(())
    }

    /// Make relative watermark and photo paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(watermark) = &mut self.watermark {
            resolve(watermark);
        }
        for stop in &mut self.stops {
            stop.photos.iter_mut().for_each(resolve);
        }
    }

    pub fn photo_count(&self) -> usize {
        self.stops.iter().map(|s| s.photos.len()).sum()
    }
}

/// Read, validate and path-resolve a plan file.
pub fn load_plan(path: &Path) -> Result<SessionPlan, PlanError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut plan = if is_json {
        SessionPlan::parse_json(&content)?
    } else {
        SessionPlan::parse_toml(&content)?
    };
    plan.validate()?;
    if let Some(base) = path.parent() {
        plan.resolve_paths(base);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Locator;
    use crate::test_helpers::timestamp;

    const PLAN: &str = r#"
watermark = "logo.png"

[[stops]]
id = "Cliente 12"
label = "Dock 4"
captured_at = "2026-03-07T09:05:00"
location = { latitude = -33.4489, longitude = -70.6693, address = "Av. Providencia 1234" }
photos = ["a.jpg", "/abs/b.jpg"]

[[stops]]
photos = ["c.jpg"]
"#;

    #[test]
    fn toml_plan_parses() {
        let plan = SessionPlan::parse_toml(PLAN).unwrap();
        plan.validate().unwrap();
        assert!(plan.include_metadata);
        assert_eq!(plan.stops.len(), 2);
        assert_eq!(plan.photo_count(), 3);

        let first = &plan.stops[0];
        assert_eq!(first.id.as_deref(), Some("Cliente 12"));
        assert_eq!(first.captured_at, Some(timestamp(2026, 3, 7, 9, 5)));

        let second = &plan.stops[1];
        assert!(second.id.is_none());
        assert!(second.label.is_empty());
        assert!(second.captured_at.is_none());
    }

    #[test]
    fn json_plan_parses() {
        let plan = SessionPlan::parse_json(
            r#"{"include_metadata": false, "stops": [{"label": "x", "photos": ["a.jpg"]}]}"#,
        )
        .unwrap();
        assert!(!plan.include_metadata);
        assert!(plan.watermark.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            SessionPlan::parse_toml("[[stops]]\nphotos = []\ncolor = \"red\"\n"),
            Err(PlanError::Toml(_))
        ));
    }

    #[test]
    fn empty_plans_are_invalid() {
        let plan = SessionPlan::parse_toml("stops = []").unwrap();
        assert!(matches!(plan.validate(), Err(PlanError::NoStops)));

        let plan = SessionPlan::parse_toml(
            "[[stops]]\nphotos = [\"a.jpg\"]\n[[stops]]\nphotos = []\n",
        )
        .unwrap();
        assert!(matches!(plan.validate(), Err(PlanError::EmptyStop(2))));
    }

    #[test]
    fn relative_paths_resolve_against_plan_dir() {
        let mut plan = SessionPlan::parse_toml(PLAN).unwrap();
        plan.resolve_paths(Path::new("/day"));
        assert_eq!(plan.watermark.as_deref(), Some(Path::new("/day/logo.png")));
        assert_eq!(plan.stops[0].photos[0], PathBuf::from("/day/a.jpg"));
        assert_eq!(plan.stops[0].photos[1], PathBuf::from("/abs/b.jpg"));
    }

    #[test]
    fn stop_locator_answers_from_plan() {
        let plan = SessionPlan::parse_toml(PLAN).unwrap();
        let mut locator = plan.stops[0].locator();
        let coords = locator.coordinates().unwrap();
        assert_eq!(coords.latitude, -33.4489);
        assert_eq!(
            locator.reverse_geocode(coords).unwrap(),
            "Av. Providencia 1234"
        );
        assert!(plan.stops[1].locator().coordinates().is_err());
    }

    #[test]
    fn load_plan_reads_json_by_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("day.json");
        std::fs::write(&path, r#"{"stops": [{"photos": ["a.jpg"]}]}"#).unwrap();
        let plan = load_plan(&path).unwrap();
        assert_eq!(plan.stops[0].photos[0], tmp.path().join("a.jpg"));
    }
}
