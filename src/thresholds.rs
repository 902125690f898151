//! Fixed classification boundaries
//!
//! All comparisons against these values live in [`crate::classifier`]; nothing
//! else in the crate hard-codes a threshold.

/// Highest AQI score still considered good air for exercise.
pub const AQI_GOOD_MAX: i64 = 2;

/// The single AQI score rendered as the moderate slot.
pub const AQI_MODERATE: i64 = 3;

/// Lowest AQI score rendered as the bad slot.
pub const AQI_BAD_MIN: i64 = 4;

/// Score assumed when the pollution record has no AQI score.
pub const AQI_MISSING_DEFAULT: i64 = 3;

/// UV index mapped to a full gauge.
pub const UV_GAUGE_MAX: f64 = 11.0;

/// Upper bound (inclusive) of the low UV tier.
pub const UV_LOW_MAX: f64 = 2.0;

/// Upper bound (inclusive) of the moderate UV tier.
pub const UV_MODERATE_MAX: f64 = 5.0;

/// Upper bound (inclusive) of the high UV tier.
pub const UV_HIGH_MAX: f64 = 7.0;

/// Pollen concentrations strictly above this are high.
pub const POLLEN_HIGH_ABOVE: f64 = 50.0;

/// Pollen concentrations strictly above this are moderate.
pub const POLLEN_MODERATE_ABOVE: f64 = 10.0;

/// Pollen concentration mapped to a full bar.
pub const POLLEN_BAR_MAX: f64 = 100.0;
