//! The presentation-ready view model

use serde::Serialize;

use crate::classifier::{AqiSeverity, PollenBand, PollenLevel, UvBand};
use crate::models::{ForecastDay, WeatherReading};
use crate::verdict::TrafficLight;

/// Colour slot the presentation layer maps to its palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Violet,
    Blue,
    Green,
    Amber,
    Orange,
    Red,
}

/// One bar of the pollutant chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantEntry {
    /// Upstream pollutant code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Concentration in µg/m³; `None` means no reading, not zero
    pub value: Option<f64>,
    pub color_token: ColorToken,
}

/// One row of the pollen breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollenEntry {
    pub name: String,
    pub value: f64,
    /// Bar width, 0-100
    pub percent_fill: f64,
    /// Severity of this entry alone
    pub level: PollenLevel,
    pub color_token: ColorToken,
}

/// Air quality card and sport verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutionSummary {
    /// Score used for classification (defaulted when missing)
    pub aqi_score: i64,
    /// Whether the score came from upstream
    pub score_reported: bool,
    pub status: Option<String>,
    pub recommendation: Option<String>,
    pub is_good_for_exercise: bool,
    pub severity: AqiSeverity,
    pub indicators: TrafficLight,
}

/// Everything the dashboard renders for one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedViewModel {
    pub location: Option<String>,
    pub weather: Option<WeatherReading>,
    /// Empty when no pollutant details were reported
    pub pollution_series: Vec<PollutantEntry>,
    pub pollution_summary: PollutionSummary,
    pub uv_band: UvBand,
    pub pollen_band: PollenBand,
    /// Input order
    pub pollen_series: Vec<PollenEntry>,
    pub forecast: Vec<ForecastDay>,
}
