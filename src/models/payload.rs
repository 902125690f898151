//! The multi-source payload produced by one fetch

use serde::{Deserialize, Serialize};

use super::lenient;
use super::{PollenReading, PollutionReading, RawForecastDay, RawLocation, UvReading, WeatherReading};

/// Raw, untrusted payload. Any sub-record may be missing; a malformed one is
/// dropped on decode rather than failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    #[serde(
        default,
        deserialize_with = "lenient::sub_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather: Option<WeatherReading>,
    #[serde(
        default,
        deserialize_with = "lenient::sub_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub pollution: Option<PollutionReading>,
    #[serde(
        default,
        deserialize_with = "lenient::sub_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub uv: Option<UvReading>,
    #[serde(
        default,
        deserialize_with = "lenient::sub_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub pollen: Option<PollenReading>,
    /// Malformed days are dropped one by one
    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Option::is_none"
    )]
    pub forecast: Option<Vec<RawForecastDay>>,
    #[serde(
        default,
        deserialize_with = "lenient::sub_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<RawLocation>,
    #[serde(
        default,
        deserialize_with = "lenient::error_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl RawPayload {
    /// Payload that only reports an upstream failure
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// The upstream error, if one is set and not blank
    #[must_use]
    pub fn upstream_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_a_valid_payload() {
        let payload: RawPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, RawPayload::default());
        assert!(payload.upstream_error().is_none());
    }

    #[test]
    fn test_blank_error_is_not_an_error() {
        let payload: RawPayload = serde_json::from_str(r#"{"error": "  "}"#).unwrap();
        assert!(payload.upstream_error().is_none());

        let payload: RawPayload = serde_json::from_str(r#"{"error": null}"#).unwrap();
        assert!(payload.upstream_error().is_none());
    }

    const VALID_CORE: &str = r#""weather": {"temperature": 14.0}, "pollution": {"aqi_score": 2}"#;

    fn with_core(extra: &str) -> RawPayload {
        serde_json::from_str(&format!("{{{VALID_CORE}, {extra}}}")).unwrap()
    }

    #[test]
    fn test_malformed_uv_is_dropped_alone() {
        let payload = with_core(r#""uv": {"index": "n/a"}, "pollen": {"grass": 12.0}"#);
        assert!(payload.uv.is_none());
        assert_eq!(payload.pollen.as_ref().and_then(|p| p.get("grass")), Some(12.0));
        assert_eq!(payload.weather.as_ref().and_then(|w| w.temperature), Some(14.0));
    }

    #[test]
    fn test_float_aqi_score_is_accepted() {
        let payload: RawPayload =
            serde_json::from_str(r#"{"pollution": {"aqi_score": 2.0, "status": "Good"}}"#).unwrap();
        let pollution = payload.pollution.unwrap();
        assert_eq!(pollution.aqi_score, Some(2));
        assert_eq!(pollution.status.as_deref(), Some("Good"));
    }

    #[test]
    fn test_location_with_name_only() {
        let payload = with_core(r#""location": {"name": "Lyon"}"#);
        assert_eq!(
            payload.location.and_then(|l| l.display_name()).as_deref(),
            Some("Lyon")
        );
    }

    #[test]
    fn test_bad_forecast_day_is_skipped() {
        let payload = with_core(
            r#""forecast": [{"date": "2024-06-01", "temperature": "hot"}, {"date": "2024-06-02"}]"#,
        );
        let forecast = payload.forecast.unwrap();
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].date.as_deref(), Some("2024-06-02"));
    }

    #[test]
    fn test_non_string_error_still_signals_failure() {
        let payload: RawPayload = serde_json::from_str(r#"{"error": 503}"#).unwrap();
        assert_eq!(payload.upstream_error(), Some("503"));
    }

    #[test]
    fn test_failed_payload_serializes_error_only() {
        let json = serde_json::to_string(&RawPayload::failed("Unable to retrieve data.")).unwrap();
        assert_eq!(json, r#"{"error":"Unable to retrieve data."}"#);
    }
}
