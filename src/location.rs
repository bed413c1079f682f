//! Geolocation and reverse geocoding collaborators.
//!
//! Location is best-effort. A [`Locator`] that fails never blocks a capture;
//! the metadata simply goes without coordinates or address.
//!
//! The [`nominatim`] submodule turns an OpenStreetMap Nominatim `reverse`
//! response into the one-line address printed on reports. Fetching that
//! response is left to the caller.

use crate::types::Coordinates;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,
    #[error("Geolocation permission denied")]
    PermissionDenied,
    #[error("Location information is unavailable")]
    Unavailable,
    #[error("Timed out waiting for a position fix")]
    Timeout,
    #[error("Reverse geocoding failed: {0}")]
    Geocode(String),
}

/// Source of the device position and its street address.
pub trait Locator {
    fn coordinates(&mut self) -> Result<Coordinates, LocationError>;

    fn reverse_geocode(&mut self, coordinates: Coordinates) -> Result<String, LocationError>;
}

/// A locator with a preset answer, for plans and tests.
///
/// `None` coordinates report [`LocationError::Unavailable`]; `None` address
/// reports a geocoding failure.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
}

impl FixedLocator {
    pub fn new(coordinates: Option<Coordinates>, address: Option<String>) -> Self {
        Self {
            coordinates,
            address,
        }
    }

    /// A locator that never knows where it is.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl Locator for FixedLocator {
    fn coordinates(&mut self) -> Result<Coordinates, LocationError> {
        self.coordinates.ok_or(LocationError::Unavailable)
    }

    fn reverse_geocode(&mut self, _coordinates: Coordinates) -> Result<String, LocationError> {
        self.address
            .clone()
            .ok_or_else(|| LocationError::Geocode("no address for these coordinates".into()))
    }
}

pub mod nominatim {
    //! Address formatting for Nominatim `reverse?format=json&addressdetails=1`.

    use serde_json::Value;

    /// Components joined into the address, in print order. The locality is
    /// the first of `city`, `town`, `village` that is present.
    const LEADING: &[&str] = &["road", "house_number", "suburb"];
    const LOCALITY: &[&str] = &["city", "town", "village"];
    const TRAILING: &[&str] = &["state", "country"];

    /// Build a one-line address from a Nominatim response.
    ///
    /// Uses the structured `address` object when it yields any component,
    /// then `display_name`, then gives up.
    pub fn format_address(response: &Value) -> Option<String> {
        if let Some(address) = response.get("address").and_then(Value::as_object) {
            let field = |key: &&str| {
                address
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            };
            let parts: Vec<&str> = LEADING
                .iter()
                .filter_map(field)
                .chain(LOCALITY.iter().find_map(field))
                .chain(TRAILING.iter().filter_map(field))
                .collect();
            if !parts.is_empty() {
                return Some(parts.join(", "));
            }
        }
        response
            .get("display_name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn joins_components_in_order() {
            let response = json!({
                "address": {
                    "country": "España",
                    "road": "Calle de Alcalá",
                    "city": "Madrid",
                    "house_number": "42",
                    "postcode": "28014",
                    "suburb": "Retiro",
                    "state": "Comunidad de Madrid"
                },
                "display_name": "ignored"
            });
            assert_eq!(
                format_address(&response).as_deref(),
                Some("Calle de Alcalá, 42, Retiro, Madrid, Comunidad de Madrid, España")
            );
        }

        #[test]
        fn city_wins_over_town_and_village() {
            let response = json!({
                "address": { "village": "Villa", "town": "Town", "city": "City" }
            });
            assert_eq!(format_address(&response).as_deref(), Some("City"));

            let response = json!({ "address": { "village": "Villa", "town": "Town" } });
            assert_eq!(format_address(&response).as_deref(), Some("Town"));
        }

        #[test]
        fn falls_back_to_display_name() {
            let response = json!({ "display_name": "Somewhere, Earth" });
            assert_eq!(
                format_address(&response).as_deref(),
                Some("Somewhere, Earth")
            );

            let response = json!({ "address": { "postcode": "1000" }, "display_name": "Post" });
            assert_eq!(format_address(&response).as_deref(), Some("Post"));
        }

        #[test]
        fn nothing_usable_is_none() {
            assert_eq!(format_address(&json!({ "error": "Unable to geocode" })), None);
        }
    }
}
