//! Current weather and forecast day models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current conditions as reported upstream.
///
/// Every field may be missing; `minimum <= maximum` is not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Perceived temperature in Celsius
    #[serde(alias = "ressentit")]
    pub feels_like: Option<f64>,
    /// Daily minimum in Celsius
    pub minimum: Option<f64>,
    /// Daily maximum in Celsius
    pub maximum: Option<f64>,
    /// Wind speed in km/h
    #[serde(alias = "vent")]
    pub wind_speed: Option<f64>,
    /// Free-text description of the conditions
    pub description: Option<String>,
    /// Opaque upstream icon identifier
    #[serde(alias = "icon")]
    pub icon_id: Option<String>,
}

/// One forecast entry as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastDay {
    /// `YYYY-MM-DD`, optionally followed by a time of day
    pub date: Option<String>,
    pub temperature: Option<f64>,
    #[serde(alias = "ressentit")]
    pub feels_like: Option<f64>,
    #[serde(alias = "vent")]
    pub wind_speed: Option<f64>,
    pub description: Option<String>,
    #[serde(alias = "icon")]
    pub icon_id: Option<String>,
}

/// One day of the multi-day forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// Calendar date of the forecast slot
    pub date: NaiveDate,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Perceived temperature in Celsius
    pub feels_like: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    pub description: Option<String>,
    pub icon_id: Option<String>,
}

impl RawForecastDay {
    /// Parse the calendar date out of `date`
    #[must_use]
    pub fn parse_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?.trim();
        let day = date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Convert into a forecast day; `None` when the date is missing or invalid
    #[must_use]
    pub fn to_forecast_day(&self) -> Option<ForecastDay> {
        Some(ForecastDay {
            date: self.parse_date()?,
            temperature: self.temperature,
            feels_like: self.feels_like,
            wind_speed: self.wind_speed,
            description: self.description.clone(),
            icon_id: self.icon_id.clone(),
        })
    }
}
