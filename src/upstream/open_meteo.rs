//! Open-Meteo client: UV and pollen from the air quality API, and geocoding

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::models::{Location, PollenReading, UvReading};

/// Pollen species requested, in display order
pub const POLLEN_SPECIES: [&str; 6] = ["alder", "birch", "grass", "mugwort", "olive", "ragweed"];

/// UV and pollen for one location; either part may be missing
#[derive(Debug, Clone, Default)]
pub struct Exposure {
    pub uv: Option<UvReading>,
    pub pollen: Option<PollenReading>,
}

/// Client for the Open-Meteo air quality and geocoding APIs
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    air_quality_base_url: String,
    geocoding_base_url: String,
}

impl OpenMeteoClient {
    pub fn new(
        client: ClientWithMiddleware,
        air_quality_base_url: impl Into<String>,
        geocoding_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            air_quality_base_url: air_quality_base_url.into().trim_end_matches('/').to_string(),
            geocoding_base_url: geocoding_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Current UV index and pollen concentrations
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    pub async fn exposure(&self, location: &Location) -> Result<Exposure> {
        let pollen_fields: Vec<String> = POLLEN_SPECIES
            .iter()
            .map(|species| format!("{species}_pollen"))
            .collect();
        let url = format!(
            "{}/air-quality?latitude={}&longitude={}&current=uv_index,{}",
            self.air_quality_base_url,
            location.latitude,
            location.longitude,
            pollen_fields.join(",")
        );
        debug!("Open-Meteo air quality request URL: {}", url);
        let start_time = Instant::now();

        let response: AirQualityResponse = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Failed to request Open-Meteo air quality")?
            .error_for_status()
            .with_context(|| "Open-Meteo air quality request was rejected")?
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo air quality response")?;

        info!(
            "Retrieved UV and pollen in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(response.into_exposure())
    }

    /// Resolve a city name; `None` when nothing matches
    #[instrument(skip(self))]
    pub async fn geocode(&self, city: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.geocoding_base_url,
            urlencoding::encode(city)
        );

        let response: GeocodingResponse = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Failed to request Open-Meteo geocoding")?
            .error_for_status()
            .with_context(|| "Open-Meteo geocoding request was rejected")?
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo geocoding response")?;

        let location = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Location::from);

        match &location {
            Some(found) => debug!(
                "Geocoded '{}' to {} ({:.4}, {:.4})",
                city, found.name, found.latitude, found.longitude
            ),
            None => warn!("No geocoding results for '{}'", city),
        }

        Ok(location)
    }
}

/// WHO label for a UV index, as published alongside the raw value
#[must_use]
pub fn who_uv_level(index: f64) -> &'static str {
    match index.round() as i64 {
        i64::MIN..=2 => "Low",
        3..=5 => "Moderate",
        6..=7 => "High",
        8..=10 => "Very high",
        _ => "Extreme",
    }
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    current: HashMap<String, Value>,
}

impl AirQualityResponse {
    fn into_exposure(self) -> Exposure {
        let uv = self
            .current
            .get("uv_index")
            .and_then(Value::as_f64)
            .map(|index| UvReading {
                index: Some(index),
                level: Some(who_uv_level(index).to_string()),
            });

        let pollen: PollenReading = POLLEN_SPECIES
            .iter()
            .filter_map(|species| {
                self.current
                    .get(&format!("{species}_pollen"))
                    .and_then(Value::as_f64)
                    .map(|value| (*species, value))
            })
            .collect();

        Exposure {
            uv,
            // Open-Meteo reports null pollen outside its coverage area
            pollen: (!pollen.is_empty()).then_some(pollen),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country_code: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            country: result.country_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_exposure_from_current() {
        let json = r#"{
            "latitude": 48.56, "longitude": 7.76,
            "current": {"time": "2024-06-01T12:00", "interval": 3600, "uv_index": 6.45,
                        "alder_pollen": 0.0, "birch_pollen": 1.2, "grass_pollen": 35.5,
                        "mugwort_pollen": 0.0, "olive_pollen": null, "ragweed_pollen": 0.0}
        }"#;
        let response: AirQualityResponse = serde_json::from_str(json).unwrap();
        let exposure = response.into_exposure();

        let uv = exposure.uv.unwrap();
        assert_eq!(uv.index, Some(6.45));
        assert_eq!(uv.level.as_deref(), Some("High"));

        let pollen = exposure.pollen.unwrap();
        let names: Vec<&str> = pollen.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alder", "birch", "grass", "mugwort", "ragweed"]);
        assert_eq!(pollen.get("grass"), Some(35.5));
    }

    #[test]
    fn test_pollen_outside_coverage_is_missing() {
        let json = r#"{"current": {"uv_index": null, "alder_pollen": null}}"#;
        let response: AirQualityResponse = serde_json::from_str(json).unwrap();
        let exposure = response.into_exposure();
        assert!(exposure.uv.is_none());
        assert!(exposure.pollen.is_none());
    }

    #[rstest]
    #[case(0.0, "Low")]
    #[case(2.4, "Low")]
    #[case(2.6, "Moderate")]
    #[case(7.0, "High")]
    #[case(9.9, "Very high")]
    #[case(11.2, "Extreme")]
    fn test_who_uv_level(#[case] index: f64, #[case] level: &str) {
        assert_eq!(who_uv_level(index), level);
    }

    #[test]
    fn test_geocoding_result_conversion() {
        let json = r#"{"results": [{"id": 2973783, "name": "Strasbourg", "latitude": 48.58392,
                        "longitude": 7.74553, "country_code": "FR", "country": "France"}]}"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let location = Location::from(response.results.unwrap().remove(0));
        assert_eq!(location.name, "Strasbourg");
        assert_eq!(location.country.as_deref(), Some("FR"));
    }
}
