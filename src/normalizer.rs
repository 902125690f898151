//! Pollutant chart series

use crate::models::PollutionReading;
use crate::view::{ColorToken, PollutantEntry};

/// Chart order, display name and colour of each charted pollutant
pub const POLLUTANT_SERIES: [(&str, &str, ColorToken); 5] = [
    ("pm2_5", "PM2.5", ColorToken::Violet),
    ("pm10", "PM10", ColorToken::Blue),
    ("no2", "NO2", ColorToken::Amber),
    ("o3", "O3", ColorToken::Orange),
    ("so2", "SO2", ColorToken::Green),
];

/// Build the pollutant series.
///
/// No `details` record gives an empty series. With a record the series always has
/// five entries in chart order and unreported pollutants carry `None`.
#[must_use]
pub fn pollutant_series(reading: Option<&PollutionReading>) -> Vec<PollutantEntry> {
    let Some(reading) = reading.filter(|reading| reading.details.is_some()) else {
        return Vec::new();
    };

    POLLUTANT_SERIES
        .iter()
        .map(|&(code, name, color_token)| PollutantEntry {
            code,
            name,
            value: reading.concentration(code),
            color_token,
        })
        .collect()
}
