//! Air pollution reading

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::lenient;

/// Pollution record from the air quality provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutionReading {
    /// AQI tier, 1 (best) to 5 (worst) by convention; any value is accepted
    #[serde(default, deserialize_with = "lenient::score")]
    pub aqi_score: Option<i64>,
    /// Status label, passed through untouched
    pub status: Option<String>,
    /// Sport recommendation, passed through untouched
    pub recommendation: Option<String>,
    /// Pollutant code (`pm2_5`, `pm10`, ...) to concentration in µg/m³
    #[serde(default, deserialize_with = "lenient::concentrations")]
    pub details: Option<HashMap<String, Option<f64>>>,
}

impl PollutionReading {
    /// Concentration of one pollutant, `None` when not reported
    #[must_use]
    pub fn concentration(&self, code: &str) -> Option<f64> {
        self.details.as_ref()?.get(code).copied().flatten()
    }
}
