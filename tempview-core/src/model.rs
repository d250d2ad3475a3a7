use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{condition::ConditionMain, error::LocationError};

const KELVIN_OFFSET: f64 = 273.15;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let lat_ok = (-90.0..=90.0).contains(&latitude);
        let lon_ok = (-180.0..=180.0).contains(&longitude);

        if !lat_ok || !lon_ok {
            return Err(LocationError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Current conditions as of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_kelvin: f64,
    pub condition_main: ConditionMain,
    pub condition_description: String,
    pub wind_speed_mps: f64,
    pub humidity_pct: u8,
    pub visibility_m: f64,
    pub pressure_hpa: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// Whole degrees Celsius, halves rounded up (-0.5 becomes 0).
    pub fn temperature_celsius(&self) -> i64 {
        kelvin_to_celsius(self.temperature_kelvin)
    }

    pub fn visibility_km(&self) -> f64 {
        self.visibility_m / 1000.0
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET + 0.5).floor() as i64
}

/// What the user typed into the search box.
///
/// The empty string means "use the device location"; anything else, including
/// whitespace, is a by-name search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn device_location() -> Self {
        Self::default()
    }

    pub fn is_device_location(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SearchQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SearchQuery {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(kelvin: f64, visibility_m: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Paris".into(),
            temperature_kelvin: kelvin,
            condition_main: ConditionMain::Rain,
            condition_description: "light rain".into(),
            wind_speed_mps: 3.5,
            humidity_pct: 80,
            visibility_m,
            pressure_hpa: 1012.0,
            observed_at: None,
        }
    }

    #[test]
    fn celsius_is_rounded() {
        assert_eq!(snapshot(300.15, 0.0).temperature_celsius(), 27);
        assert_eq!(snapshot(288.15, 0.0).temperature_celsius(), 15);
        assert_eq!(kelvin_to_celsius(263.15), -10);
    }

    #[test]
    fn negative_halves_round_up() {
        assert_eq!(kelvin_to_celsius(272.65), 0);
        assert_eq!(kelvin_to_celsius(262.65), -10);
        assert_eq!(snapshot(272.65, 0.0).temperature_celsius(), 0);
    }

    #[test]
    fn visibility_in_km() {
        assert_eq!(snapshot(0.0, 9000.0).visibility_km(), 9.0);
        assert_eq!(snapshot(0.0, 9500.0).visibility_km(), 9.5);
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(48.85, 2.35).is_ok());
        assert!(Coordinates::new(90.0, -180.0).is_ok());

        let err = Coordinates::new(91.0, 0.0).unwrap_err();
        assert!(matches!(err, LocationError::InvalidCoordinates { .. }));
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn empty_query_means_device_location() {
        assert!(SearchQuery::device_location().is_device_location());
        assert!(SearchQuery::from("").is_device_location());
        assert!(!SearchQuery::from("Paris").is_device_location());
        assert!(!SearchQuery::from(" ").is_device_location());
    }
}
