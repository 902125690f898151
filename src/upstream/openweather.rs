//! OpenWeather client: current weather, air pollution and 5-day forecast

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::classifier::AqiTier;
use crate::labels::Locale;
use crate::models::{Location, PollutionReading, RawForecastDay, WeatherReading};

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

/// Client for the OpenWeather data API
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    locale: Locale,
}

/// Current weather together with the place name OpenWeather resolved
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub reading: WeatherReading,
    pub place_name: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        api_key: Option<String>,
        locale: Locale,
    ) -> Self {
        if api_key.is_none() {
            warn!("No OpenWeather API key configured; weather and pollution requests will fail");
        }
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            locale,
        }
    }

    fn lang(&self) -> &'static str {
        match self.locale {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    fn url(&self, endpoint: &str, location: &Location, metric: bool) -> String {
        let mut url = format!(
            "{}/{}?lat={}&lon={}&appid={}",
            self.base_url,
            endpoint,
            location.latitude,
            location.longitude,
            urlencoding::encode(self.api_key.as_deref().unwrap_or_default())
        );
        if metric {
            url.push_str("&units=metric&lang=");
            url.push_str(self.lang());
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let redacted = url.split("appid=").next().unwrap_or(url);
        debug!("OpenWeather request: {}appid=***", redacted);
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request OpenWeather {what}"))?
            .error_for_status()
            .with_context(|| format!("OpenWeather {what} request was rejected"))?;

        let body: T = response
            .json()
            .await
            .with_context(|| format!("Failed to parse OpenWeather {what} response"))?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved OpenWeather {} in {:.3}s",
            what,
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow OpenWeather {} response: {:.3}s",
                what,
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }

    /// Current conditions, wind converted to km/h
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    pub async fn current_weather(&self, location: &Location) -> Result<CurrentWeather> {
        let url = self.url("weather", location, true);
        let response: WeatherResponse = self.get_json(&url, "weather").await?;
        Ok(response.into_current())
    }

    /// Air pollution with status and recommendation derived from the AQI score
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    pub async fn air_pollution(&self, location: &Location) -> Result<PollutionReading> {
        let url = self.url("air_pollution", location, false);
        let response: AirPollutionResponse = self.get_json(&url, "air pollution").await?;
        response.into_reading(self.locale)
    }

    /// One forecast slot per day, the one at `forecast_hour` (`HH:MM:SS`)
    #[instrument(skip(self), fields(lat = location.latitude, lon = location.longitude))]
    pub async fn daily_forecast(
        &self,
        location: &Location,
        forecast_hour: &str,
    ) -> Result<Vec<RawForecastDay>> {
        let url = self.url("forecast", location, true);
        let response: ForecastResponse = self.get_json(&url, "forecast").await?;
        Ok(response.daily_slots(forecast_hour))
    }
}

#[derive(Debug, Deserialize)]
struct MainData {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: Option<String>,
    main: MainData,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Option<Wind>,
}

impl WeatherResponse {
    fn into_current(self) -> CurrentWeather {
        let condition = self.weather.into_iter().next();
        let (description, icon_id) = condition
            .map(|c| (c.description, c.icon))
            .unwrap_or_default();

        CurrentWeather {
            reading: WeatherReading {
                temperature: self.main.temp,
                feels_like: self.main.feels_like,
                minimum: self.main.temp_min,
                maximum: self.main.temp_max,
                wind_speed: self.wind.and_then(|w| w.speed).map(|s| s * MS_TO_KMH),
                description,
                icon_id,
            },
            place_name: self.name.filter(|name| !name.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AqiMain {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct PollutionEntry {
    main: AqiMain,
    #[serde(default)]
    components: HashMap<String, Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<PollutionEntry>,
}

impl AirPollutionResponse {
    fn into_reading(self, locale: Locale) -> Result<PollutionReading> {
        let entry = self
            .list
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Air pollution response contained no measurements"))?;

        let aqi = entry.main.aqi;
        let tier = AqiTier::classify(Some(aqi));
        Ok(PollutionReading {
            aqi_score: Some(aqi),
            status: Some(locale.aqi_status(aqi).to_string()),
            recommendation: Some(locale.sport_recommendation(tier.severity).to_string()),
            details: Some(entry.components),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt_txt: String,
    main: MainData,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastSlot>,
}

impl ForecastResponse {
    fn daily_slots(self, forecast_hour: &str) -> Vec<RawForecastDay> {
        self.list
            .into_iter()
            .filter(|slot| slot.dt_txt.ends_with(forecast_hour))
            .map(|slot| {
                let condition = slot.weather.into_iter().next();
                let (description, icon_id) = condition
                    .map(|c| (c.description, c.icon))
                    .unwrap_or_default();
                RawForecastDay {
                    date: Some(slot.dt_txt),
                    temperature: slot.main.temp,
                    feels_like: slot.main.feels_like,
                    wind_speed: slot.wind.and_then(|w| w.speed).map(|s| s * MS_TO_KMH),
                    description,
                    icon_id,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_response_conversion() {
        let json = r#"{
            "coord": {"lon": 7.75, "lat": 48.57},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 21.3, "feels_like": 20.8, "temp_min": 19.9, "temp_max": 22.7,
                     "pressure": 1018, "humidity": 48},
            "wind": {"speed": 5.0, "deg": 240},
            "name": "Strasbourg"
        }"#;
        let response: WeatherResponse = serde_json::from_str(json).unwrap();
        let current = response.into_current();
        assert_eq!(current.place_name.as_deref(), Some("Strasbourg"));
        assert_eq!(current.reading.temperature, Some(21.3));
        assert_eq!(current.reading.wind_speed, Some(18.0));
        assert_eq!(current.reading.icon_id.as_deref(), Some("01d"));
    }

    #[test]
    fn test_air_pollution_conversion() {
        let json = r#"{
            "coord": {"lon": 7.75, "lat": 48.57},
            "list": [{"main": {"aqi": 3},
                      "components": {"co": 230.3, "no": 0.1, "no2": 12.4, "o3": 81.5,
                                     "so2": 1.2, "pm2_5": 9.8, "pm10": 14.1, "nh3": 2.3},
                      "dt": 1717236000}]
        }"#;
        let response: AirPollutionResponse = serde_json::from_str(json).unwrap();
        let reading = response.into_reading(Locale::En).unwrap();
        assert_eq!(reading.aqi_score, Some(3));
        assert_eq!(reading.status.as_deref(), Some("Moderate"));
        assert_eq!(
            reading.recommendation.as_deref(),
            Some("Acceptable conditions, but avoid intense effort.")
        );
        assert_eq!(reading.concentration("pm2_5"), Some(9.8));
    }

    #[test]
    fn test_empty_air_pollution_is_an_error() {
        let response: AirPollutionResponse = serde_json::from_str(r#"{"list": []}"#).unwrap();
        assert!(response.into_reading(Locale::En).is_err());
    }

    #[test]
    fn test_forecast_keeps_one_slot_per_day() {
        let json = r#"{"list": [
            {"dt_txt": "2024-06-01 09:00:00", "main": {"temp": 17.0}, "weather": [], "wind": {"speed": 1.0}},
            {"dt_txt": "2024-06-01 12:00:00", "main": {"temp": 22.0}, "weather": [{"description": "sun", "icon": "01d"}], "wind": {"speed": 2.0}},
            {"dt_txt": "2024-06-02 12:00:00", "main": {"temp": 24.0}, "weather": [], "wind": null}
        ]}"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let days = response.daily_slots("12:00:00");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature, Some(22.0));
        assert_eq!(days[0].wind_speed, Some(7.2));
        assert_eq!(days[0].description.as_deref(), Some("sun"));
        assert_eq!(days[1].wind_speed, None);
    }
}
