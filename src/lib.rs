//! `SafeBreathe` - environmental snapshot for outdoor exercise
//!
//! This library gathers weather, air pollution, UV and pollen readings for a
//! location, classifies them into display-ready bands and derives a verdict on
//! whether outdoor exercise is advisable.

pub mod aggregator;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod labels;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod state;
pub mod thresholds;
pub mod upstream;
pub mod verdict;
pub mod view;
pub mod web;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use classifier::{AqiSeverity, AqiTier, PollenBand, PollenLevel, UvBand, UvTier};
pub use config::SafeBreatheConfig;
pub use error::{FetchFailure, GENERIC_FAILURE_MESSAGE, SafeBreatheError};
pub use labels::Locale;
pub use models::{
    Location, LocationQuery, PollenReading, PollutionReading, RawPayload, UvReading,
    WeatherReading,
};
pub use orchestrator::{Geolocator, HttpPayloadSource, Orchestrator, PayloadSource, Position};
pub use state::{DashboardState, DashboardStore, Outcome, RequestTicket};
pub use upstream::{DashboardAssembler, LocalPayloadSource};
pub use verdict::{Indicator, TrafficLight};
pub use view::{ColorToken, UnifiedViewModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SafeBreatheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
