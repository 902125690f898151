//! Payload aggregation
//!
//! Turns one [`RawPayload`] into a [`UnifiedViewModel`]. Each sub-record is
//! processed on its own, so a missing UV reading never prevents the pollen band
//! or the verdict from being derived.

use tracing::{debug, warn};

use crate::classifier::{AqiTier, PollenBand, UvBand, pollen_series};
use crate::labels::Locale;
use crate::models::{ForecastDay, RawForecastDay, RawPayload};
use crate::normalizer::pollutant_series;
use crate::verdict::TrafficLight;
use crate::view::{PollutionSummary, UnifiedViewModel};
use crate::{Result, SafeBreatheError};

/// Stateless payload-to-view transform
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    locale: Locale,
}

impl Aggregator {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Build the view model.
    ///
    /// # Errors
    ///
    /// Returns [`SafeBreatheError::Upstream`] with the payload's message, verbatim,
    /// when the payload carries a non-blank `error`. Nothing else fails.
    pub fn aggregate(&self, payload: &RawPayload) -> Result<UnifiedViewModel> {
        if let Some(message) = payload.upstream_error() {
            debug!("Payload carries upstream error: {}", message);
            return Err(SafeBreatheError::upstream(message));
        }

        let pollution = payload.pollution.as_ref();
        let tier = AqiTier::classify(pollution.and_then(|p| p.aqi_score));

        let pollution_summary = PollutionSummary {
            aqi_score: tier.score,
            score_reported: pollution.and_then(|p| p.aqi_score).is_some(),
            status: pollution.and_then(|p| p.status.clone()),
            recommendation: pollution.and_then(|p| p.recommendation.clone()),
            is_good_for_exercise: tier.is_good_air,
            severity: tier.severity,
            indicators: TrafficLight::from_tier(&tier),
        };

        let view = UnifiedViewModel {
            location: payload.location.as_ref().and_then(|l| l.display_name()),
            weather: payload.weather.clone(),
            pollution_series: pollutant_series(pollution),
            pollution_summary,
            uv_band: UvBand::classify(payload.uv.as_ref(), self.locale),
            pollen_band: PollenBand::classify(payload.pollen.as_ref(), self.locale),
            pollen_series: pollen_series(payload.pollen.as_ref()),
            forecast: forecast_days(payload.forecast.as_deref()),
        };

        debug!(
            "Aggregated payload: aqi={}, uv_available={}, pollen_rows={}, forecast_days={}",
            view.pollution_summary.aqi_score,
            view.uv_band.is_available(),
            view.pollen_series.len(),
            view.forecast.len()
        );

        Ok(view)
    }
}

/// Forecast days in input order, skipping entries without a usable date
fn forecast_days(raw: Option<&[RawForecastDay]>) -> Vec<ForecastDay> {
    raw.unwrap_or_default()
        .iter()
        .filter_map(|day| {
            let parsed = day.to_forecast_day();
            if parsed.is_none() {
                warn!("Skipping forecast entry with invalid date: {:?}", day.date);
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{PollenLevel, UvTier};
    use crate::models::{PollenReading, PollutionReading, UvReading, WeatherReading};

    fn full_payload() -> RawPayload {
        RawPayload {
            weather: Some(WeatherReading {
                temperature: Some(18.2),
                description: Some("few clouds".into()),
                ..Default::default()
            }),
            pollution: Some(PollutionReading {
                aqi_score: Some(4),
                status: Some("Poor".into()),
                recommendation: Some("Stay indoors".into()),
                details: Some([("pm10".to_string(), Some(41.0))].into_iter().collect()),
            }),
            uv: Some(UvReading {
                index: Some(3.0),
                level: Some("Moderate".into()),
            }),
            pollen: Some([("grass", 22.0)].into_iter().collect::<PollenReading>()),
            forecast: Some(vec![RawForecastDay {
                date: Some("2024-06-01 12:00:00".into()),
                temperature: Some(24.0),
                ..Default::default()
            }]),
            location: Some(crate::models::RawLocation::Name("Colmar".into())),
            error: None,
        }
    }

    #[test]
    fn test_full_payload() {
        let view = Aggregator::default().aggregate(&full_payload()).unwrap();
        assert_eq!(view.location.as_deref(), Some("Colmar"));
        assert_eq!(view.pollution_series.len(), 5);
        assert!(!view.pollution_summary.is_good_for_exercise);
        assert!(view.pollution_summary.indicators.red);
        assert_eq!(view.pollution_summary.status.as_deref(), Some("Poor"));
        assert!(matches!(
            view.uv_band,
            UvBand::Available(ref band) if band.tier == UvTier::Moderate
        ));
        assert_eq!(view.pollen_band.level(), Some(PollenLevel::Moderate));
        assert_eq!(view.forecast.len(), 1);
    }

    #[test]
    fn test_error_suppresses_everything() {
        let mut payload = full_payload();
        payload.error = Some("rate limited".into());
        let err = Aggregator::default().aggregate(&payload).unwrap_err();
        assert!(matches!(err, SafeBreatheError::Upstream { ref message } if message == "rate limited"));
    }

    #[test]
    fn test_empty_payload_is_all_placeholders() {
        let view = Aggregator::default().aggregate(&RawPayload::default()).unwrap();
        assert!(view.location.is_none());
        assert!(view.weather.is_none());
        assert!(view.pollution_series.is_empty());
        assert_eq!(view.pollution_summary.aqi_score, 3);
        assert!(!view.pollution_summary.score_reported);
        assert_eq!(view.uv_band, UvBand::Unavailable);
        assert_eq!(view.pollen_band, PollenBand::Unavailable);
        assert!(view.forecast.is_empty());
    }

    #[test]
    fn test_bad_forecast_dates_are_skipped() {
        let mut payload = full_payload();
        payload.forecast = Some(vec![
            RawForecastDay {
                date: Some("tomorrow".into()),
                ..Default::default()
            },
            RawForecastDay {
                date: Some("2024-06-02 12:00:00".into()),
                ..Default::default()
            },
        ]);
        let view = Aggregator::default().aggregate(&payload).unwrap();
        assert_eq!(view.forecast.len(), 1);
        assert_eq!(view.forecast[0].date.to_string(), "2024-06-02");
    }

    #[test]
    fn test_french_locale_labels() {
        let view = Aggregator::new(Locale::Fr).aggregate(&full_payload()).unwrap();
        assert!(matches!(
            view.pollen_band,
            PollenBand::Available { label: "Modéré", .. }
        ));
    }
}
