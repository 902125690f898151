//! Data models for `SafeBreathe`
//!
//! This module contains the raw upstream shapes organized by concern:
//! - Location: Geographic coordinates and location queries
//! - Weather: Current conditions and forecast days
//! - Pollution: AQI score and pollutant concentrations
//! - Exposure: UV index and pollen concentrations
//! - Payload: The multi-source record handed to the aggregator

pub mod exposure;
mod lenient;
pub mod location;
pub mod payload;
pub mod pollution;
pub mod weather;

// Re-export all public types for convenient access
pub use exposure::{PollenReading, UvReading};
pub use location::{Location, LocationQuery, RawLocation};
pub use payload::RawPayload;
pub use pollution::PollutionReading;
pub use weather::{ForecastDay, RawForecastDay, WeatherReading};
