//! Sample and marker records.
//!
//! Both derive `Deserialize` with the field names used by the dashboard's
//! JSON files (`lat`/`lon`/`value` for samples, `city`/`country`/`lat`/`lng`
//! for markers), so loaders can hand decoded records straight to the core.

use serde::{Deserialize, Serialize};

/// One PM2.5 grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees, `[-90, 90]`.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Concentration in µg/m³; `None` when the grid cell has no reading.
    #[serde(default)]
    pub value: Option<f32>,
}

impl Sample {
    /// Create a sample with a value.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, value: f32) -> Self {
        Self {
            latitude,
            longitude,
            value: Some(value),
        }
    }

    /// Create a sample without a reading.
    #[must_use]
    pub const fn empty(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            value: None,
        }
    }

    /// The value, with `NaN` readings treated as absent.
    #[must_use]
    pub fn reading(&self) -> Option<f32> {
        self.value.filter(|v| !v.is_nan())
    }
}

/// A city marker drawn on top of the pollution surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// City name.
    pub city: String,
    /// Country name.
    pub country: String,
    /// Latitude in degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Marker {
    /// Create a marker.
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    /// Identity of the marker: the `(city, country)` pair.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.city, &self.country)
    }

    /// Whether this marker is the given city.
    #[must_use]
    pub fn is(&self, city: &str, country: &str) -> bool {
        self.city == city && self.country == country
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reading_filters_nan() {
        assert_eq!(Sample::new(1.0, 2.0, 12.5).reading(), Some(12.5));
        assert_eq!(Sample::new(1.0, 2.0, f32::NAN).reading(), None);
        assert_eq!(Sample::empty(1.0, 2.0).reading(), None);
    }

    #[test]
    fn test_marker_identity() {
        let london = Marker::new("London", "United Kingdom", 51.5074, -0.1278);
        assert_eq!(london.key(), ("London", "United Kingdom"));
        assert!(london.is("London", "United Kingdom"));
        assert!(!london.is("London", "Canada"));
    }

    #[test]
    fn test_deserialize_dashboard_records() {
        let samples: Vec<Sample> = serde_yaml_ng::from_str(
            r#"[{"lat": 10.5, "lon": -20.25, "value": 33.1}, {"lat": 0, "lon": 0, "value": null}]"#,
        )
        .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].latitude, 10.5);
        assert_eq!(samples[0].longitude, -20.25);
        assert_eq!(samples[0].value, Some(33.1));
        assert_eq!(samples[1].value, None);

        let markers: Vec<Marker> = serde_yaml_ng::from_str(
            r#"[{"city": "Delhi", "country": "India", "lat": 28.61, "lng": 77.21}]"#,
        )
        .unwrap();
        assert!(markers[0].is("Delhi", "India"));
        assert_eq!(markers[0].longitude, 77.21);
    }
}
