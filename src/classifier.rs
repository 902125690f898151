//! Metric classification
//!
//! Pure functions from a raw metric to a discrete tier. AQI, UV and pollen are
//! classified independently; none of these functions share state or perform I/O.

use serde::Serialize;

use crate::labels::Locale;
use crate::models::{PollenReading, UvReading};
use crate::thresholds::{
    AQI_BAD_MIN, AQI_GOOD_MAX, AQI_MISSING_DEFAULT, AQI_MODERATE, POLLEN_BAR_MAX,
    POLLEN_HIGH_ABOVE, POLLEN_MODERATE_ABOVE, UV_GAUGE_MAX, UV_HIGH_MAX, UV_LOW_MAX,
    UV_MODERATE_MAX,
};
use crate::view::{ColorToken, PollenEntry};

/// Visual severity slot of an AQI score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiSeverity {
    Good,
    Moderate,
    Bad,
}

/// Classified AQI score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiTier {
    /// Score used for classification
    pub score: i64,
    /// `score <= 2`; the only branch the verdict depends on
    pub is_good_air: bool,
    pub severity: AqiSeverity,
}

impl AqiTier {
    /// Classify an AQI score; a missing score counts as moderate
    #[must_use]
    pub fn classify(score: Option<i64>) -> Self {
        let score = score.unwrap_or(AQI_MISSING_DEFAULT);
        let severity = if score <= AQI_GOOD_MAX {
            AqiSeverity::Good
        } else if score == AQI_MODERATE {
            AqiSeverity::Moderate
        } else {
            AqiSeverity::Bad
        };

        Self {
            score,
            is_good_air: score <= AQI_GOOD_MAX,
            severity,
        }
    }

    /// Score at or above the red threshold
    #[must_use]
    pub fn is_bad(&self) -> bool {
        self.score >= AQI_BAD_MIN
    }
}

/// UV risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UvTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl UvTier {
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        if index <= UV_LOW_MAX {
            UvTier::Low
        } else if index <= UV_MODERATE_MAX {
            UvTier::Moderate
        } else if index <= UV_HIGH_MAX {
            UvTier::High
        } else {
            UvTier::VeryHigh
        }
    }

    #[must_use]
    pub fn color_token(self) -> ColorToken {
        match self {
            UvTier::Low => ColorToken::Green,
            UvTier::Moderate => ColorToken::Amber,
            UvTier::High => ColorToken::Orange,
            UvTier::VeryHigh => ColorToken::Red,
        }
    }
}

/// Gauge fill for a UV index, clamped to 0-100
#[must_use]
pub fn uv_percent_fill(index: f64) -> f64 {
    (index / UV_GAUGE_MAX * 100.0).clamp(0.0, 100.0)
}

/// Derived UV presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UvBandReading {
    pub index: f64,
    pub percent_fill: f64,
    pub tier: UvTier,
    pub color_token: ColorToken,
    /// Advice derived from `tier`
    pub advice: &'static str,
    /// Upstream label, which may disagree with `tier`
    pub upstream_level: Option<String>,
}

/// UV card state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UvBand {
    Unavailable,
    Available(UvBandReading),
}

impl UvBand {
    /// Derive the band from an optional reading.
    ///
    /// No reading, or one without a finite index, is `Unavailable`.
    #[must_use]
    pub fn classify(reading: Option<&UvReading>, locale: Locale) -> Self {
        let Some(reading) = reading else {
            return UvBand::Unavailable;
        };
        let Some(index) = reading.index.filter(|index| index.is_finite()) else {
            return UvBand::Unavailable;
        };

        let tier = UvTier::from_index(index);
        UvBand::Available(UvBandReading {
            index,
            percent_fill: uv_percent_fill(index),
            tier,
            color_token: tier.color_token(),
            advice: locale.uv_advice(tier),
            upstream_level: reading.level.clone(),
        })
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, UvBand::Available(_))
    }
}

/// Pollen risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollenLevel {
    Low,
    Moderate,
    High,
}

impl PollenLevel {
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value > POLLEN_HIGH_ABOVE {
            PollenLevel::High
        } else if value > POLLEN_MODERATE_ABOVE {
            PollenLevel::Moderate
        } else {
            PollenLevel::Low
        }
    }

    #[must_use]
    pub fn color_token(self) -> ColorToken {
        match self {
            PollenLevel::Low => ColorToken::Green,
            PollenLevel::Moderate => ColorToken::Amber,
            PollenLevel::High => ColorToken::Red,
        }
    }
}

/// Pollen card state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollenBand {
    Unavailable,
    Available {
        /// Highest concentration across all pollen types
        max_value: f64,
        level: PollenLevel,
        label: &'static str,
    },
}

impl PollenBand {
    /// Classify by the maximum across all keys.
    ///
    /// An absent or empty mapping is `Unavailable`.
    #[must_use]
    pub fn classify(reading: Option<&PollenReading>, locale: Locale) -> Self {
        let Some(max_value) = reading.and_then(PollenReading::max_value) else {
            return PollenBand::Unavailable;
        };

        let level = PollenLevel::from_value(max_value);
        PollenBand::Available {
            max_value,
            level,
            label: locale.pollen_label(level),
        }
    }

    #[must_use]
    pub fn level(&self) -> Option<PollenLevel> {
        match self {
            PollenBand::Unavailable => None,
            PollenBand::Available { level, .. } => Some(*level),
        }
    }
}

/// Per-entry pollen rows; each row is coloured by its own value, not by the aggregate
#[must_use]
pub fn pollen_series(reading: Option<&PollenReading>) -> Vec<PollenEntry> {
    let Some(reading) = reading else {
        return Vec::new();
    };

    reading
        .iter()
        .map(|(name, value)| {
            let level = PollenLevel::from_value(value);
            PollenEntry {
                name: name.to_string(),
                value,
                percent_fill: (value / POLLEN_BAR_MAX * 100.0).clamp(0.0, 100.0),
                level,
                color_token: level.color_token(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), true, AqiSeverity::Good)]
    #[case(Some(2), true, AqiSeverity::Good)]
    #[case(Some(3), false, AqiSeverity::Moderate)]
    #[case(Some(4), false, AqiSeverity::Bad)]
    #[case(Some(5), false, AqiSeverity::Bad)]
    #[case(None, false, AqiSeverity::Moderate)]
    #[case(Some(0), true, AqiSeverity::Good)]
    #[case(Some(42), false, AqiSeverity::Bad)]
    fn test_aqi_tier(
        #[case] score: Option<i64>,
        #[case] good: bool,
        #[case] severity: AqiSeverity,
    ) {
        let tier = AqiTier::classify(score);
        assert_eq!(tier.is_good_air, good);
        assert_eq!(tier.severity, severity);
    }

    #[test]
    fn test_missing_aqi_defaults_to_three() {
        assert_eq!(AqiTier::classify(None).score, 3);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(5.5, 50.0)]
    #[case(11.0, 100.0)]
    #[case(22.0, 100.0)]
    #[case(-3.0, 0.0)]
    fn test_uv_percent_fill(#[case] index: f64, #[case] expected: f64) {
        assert!((uv_percent_fill(index) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_uv_percent_fill_is_monotonic() {
        let mut previous = uv_percent_fill(0.0);
        for step in 1..=300 {
            let fill = uv_percent_fill(f64::from(step) * 0.1);
            assert!(fill >= previous);
            assert!((0.0..=100.0).contains(&fill));
            previous = fill;
        }
    }

    #[rstest]
    #[case(0.0, UvTier::Low)]
    #[case(2.0, UvTier::Low)]
    #[case(2.1, UvTier::Moderate)]
    #[case(5.0, UvTier::Moderate)]
    #[case(7.0, UvTier::High)]
    #[case(7.01, UvTier::VeryHigh)]
    #[case(13.0, UvTier::VeryHigh)]
    fn test_uv_tier_boundaries(#[case] index: f64, #[case] tier: UvTier) {
        assert_eq!(UvTier::from_index(index), tier);
    }

    #[test]
    fn test_uv_band_missing_is_unavailable() {
        assert_eq!(UvBand::classify(None, Locale::En), UvBand::Unavailable);

        let reading = UvReading {
            index: None,
            level: Some("Low".into()),
        };
        assert_eq!(UvBand::classify(Some(&reading), Locale::En), UvBand::Unavailable);
    }

    #[test]
    fn test_uv_band_keeps_upstream_level_distinct() {
        let reading = UvReading {
            index: Some(9.0),
            level: Some("Moderate".into()),
        };
        let UvBand::Available(band) = UvBand::classify(Some(&reading), Locale::En) else {
            panic!("expected an available band");
        };
        assert_eq!(band.tier, UvTier::VeryHigh);
        assert_eq!(band.color_token, ColorToken::Red);
        assert_eq!(band.advice, "Avoid sun exposure");
        assert_eq!(band.upstream_level.as_deref(), Some("Moderate"));
    }

    #[rstest]
    #[case(&[("a", 60.0)], PollenLevel::High)]
    #[case(&[("a", 20.0)], PollenLevel::Moderate)]
    #[case(&[("a", 5.0)], PollenLevel::Low)]
    #[case(&[("a", 60.0), ("b", 5.0)], PollenLevel::High)]
    #[case(&[("a", 50.0)], PollenLevel::Moderate)]
    #[case(&[("a", 10.0)], PollenLevel::Low)]
    fn test_pollen_band(#[case] entries: &[(&str, f64)], #[case] level: PollenLevel) {
        let reading: PollenReading = entries.iter().copied().collect();
        let band = PollenBand::classify(Some(&reading), Locale::En);
        assert_eq!(band.level(), Some(level));
    }

    #[test]
    fn test_empty_pollen_is_unavailable() {
        let reading = PollenReading::new();
        assert_eq!(
            PollenBand::classify(Some(&reading), Locale::En),
            PollenBand::Unavailable
        );
        assert_eq!(PollenBand::classify(None, Locale::En), PollenBand::Unavailable);
    }

    #[test]
    fn test_pollen_rows_use_their_own_level() {
        let reading: PollenReading = [("birch", 60.0), ("grass", 5.0), ("alder", 30.0)]
            .into_iter()
            .collect();
        let band = PollenBand::classify(Some(&reading), Locale::En);
        assert_eq!(band.level(), Some(PollenLevel::High));

        let rows = pollen_series(Some(&reading));
        let colors: Vec<ColorToken> = rows.iter().map(|row| row.color_token).collect();
        assert_eq!(
            colors,
            vec![ColorToken::Red, ColorToken::Green, ColorToken::Amber]
        );
        assert_eq!(rows[0].name, "birch");
    }

    #[test]
    fn test_pollen_bar_is_clamped() {
        let reading: PollenReading = [("grass", 250.0)].into_iter().collect();
        let rows = pollen_series(Some(&reading));
        assert_eq!(rows[0].percent_fill, 100.0);
        assert!(pollen_series(None).is_empty());
    }
}
