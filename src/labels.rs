//! Locale-facing label tables for derived classifications

use serde::{Deserialize, Serialize};

use crate::classifier::{AqiSeverity, PollenLevel, UvTier};

/// Language used for labels the core derives itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Advice shown next to the UV gauge
    #[must_use]
    pub fn uv_advice(self, tier: UvTier) -> &'static str {
        match (self, tier) {
            (Locale::En, UvTier::Low) => "No protection needed",
            (Locale::En, UvTier::Moderate) => "Sunscreen recommended",
            (Locale::En, UvTier::High) => "Protection mandatory",
            (Locale::En, UvTier::VeryHigh) => "Avoid sun exposure",
            (Locale::Fr, UvTier::Low) => "Pas de protection nécessaire",
            (Locale::Fr, UvTier::Moderate) => "Crème solaire recommandée",
            (Locale::Fr, UvTier::High) => "Protection indispensable",
            (Locale::Fr, UvTier::VeryHigh) => "Évitez l'exposition",
        }
    }

    /// Badge text of the aggregate pollen risk
    #[must_use]
    pub fn pollen_label(self, level: PollenLevel) -> &'static str {
        match (self, level) {
            (Locale::En, PollenLevel::Low) => "Low",
            (Locale::En, PollenLevel::Moderate) => "Moderate",
            (Locale::En, PollenLevel::High) => "High",
            (Locale::Fr, PollenLevel::Low) => "Faible",
            (Locale::Fr, PollenLevel::Moderate) => "Modéré",
            (Locale::Fr, PollenLevel::High) => "Élevé",
        }
    }

    /// Status label for an AQI score as reported by the pollution provider
    #[must_use]
    pub fn aqi_status(self, aqi_score: i64) -> &'static str {
        match (self, aqi_score) {
            (Locale::En, 1) => "Excellent",
            (Locale::En, 2) => "Good",
            (Locale::En, 3) => "Moderate",
            (Locale::En, 4) => "Poor",
            (Locale::En, 5) => "Very poor",
            (Locale::En, _) => "Unknown",
            (Locale::Fr, 1) => "Excellent",
            (Locale::Fr, 2) => "Bon",
            (Locale::Fr, 3) => "Moyen",
            (Locale::Fr, 4) => "Mauvais",
            (Locale::Fr, 5) => "Très mauvais",
            (Locale::Fr, _) => "Inconnu",
        }
    }

    /// Sport recommendation for an AQI severity
    #[must_use]
    pub fn sport_recommendation(self, severity: AqiSeverity) -> &'static str {
        match (self, severity) {
            (Locale::En, AqiSeverity::Good) => "Ideal conditions for outdoor exercise.",
            (Locale::En, AqiSeverity::Moderate) => {
                "Acceptable conditions, but avoid intense effort."
            }
            (Locale::En, AqiSeverity::Bad) => "Stay indoors, the air is polluted.",
            (Locale::Fr, AqiSeverity::Good) => "Conditions idéales pour du sport en extérieur.",
            (Locale::Fr, AqiSeverity::Moderate) => {
                "Conditions acceptables, mais évitez l'effort intense."
            }
            (Locale::Fr, AqiSeverity::Bad) => "Restez à l'intérieur, air pollué.",
        }
    }
}
