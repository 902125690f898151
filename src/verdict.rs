//! Sport-suitability verdict

use serde::Serialize;

use crate::classifier::AqiTier;
use crate::thresholds::AQI_MODERATE;

/// One light of the verdict traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Red,
    Orange,
    Green,
}

/// Which lights are on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficLight {
    pub red: bool,
    pub orange: bool,
    pub green: bool,
}

impl TrafficLight {
    /// Select the active lights for an AQI tier
    #[must_use]
    pub fn from_tier(tier: &AqiTier) -> Self {
        Self {
            red: !tier.is_good_air && tier.is_bad(),
            orange: tier.score == AQI_MODERATE,
            green: tier.is_good_air,
        }
    }

    /// The single active light, `None` when zero or several are on
    #[must_use]
    pub fn active(&self) -> Option<Indicator> {
        match (self.red, self.orange, self.green) {
            (true, false, false) => Some(Indicator::Red),
            (false, true, false) => Some(Indicator::Orange),
            (false, false, true) => Some(Indicator::Green),
            _ => None,
        }
    }

    /// Number of lights that are on
    #[must_use]
    pub fn active_count(&self) -> usize {
        [self.red, self.orange, self.green]
            .into_iter()
            .filter(|on| *on)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Indicator::Green)]
    #[case(2, Indicator::Green)]
    #[case(3, Indicator::Orange)]
    #[case(4, Indicator::Red)]
    #[case(5, Indicator::Red)]
    fn test_exactly_one_light_for_known_scores(#[case] score: i64, #[case] expected: Indicator) {
        let tier = AqiTier::classify(Some(score));
        let light = TrafficLight::from_tier(&tier);
        assert_eq!(light.active_count(), 1);
        assert_eq!(light.active(), Some(expected));
        assert_eq!(tier.is_good_air, score <= 2);
    }

    #[test]
    fn test_missing_score_lights_orange() {
        let light = TrafficLight::from_tier(&AqiTier::classify(None));
        assert_eq!(light.active(), Some(Indicator::Orange));
    }

    #[test]
    fn test_out_of_range_scores_do_not_panic() {
        for score in [-7, 0, 6, 99] {
            let light = TrafficLight::from_tier(&AqiTier::classify(Some(score)));
            assert!(light.active_count() <= 1);
        }
    }
}
