//! Upstream payload assembly
//!
//! Queries the independent providers for one location and combines their
//! answers into a [`RawPayload`]. Weather and pollution are required; forecast,
//! UV and pollen failures only leave their sub-record empty.

pub mod open_meteo;
pub mod openweather;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::SafeBreatheConfig;
use crate::models::{Location, LocationQuery, RawLocation, RawPayload};
use crate::orchestrator::PayloadSource;

pub use open_meteo::{Exposure, OpenMeteoClient};
pub use openweather::{CurrentWeather, OpenWeatherClient};

/// Error text when a required provider fails
pub const RETRIEVAL_FAILED: &str = "Unable to retrieve data.";

/// Builds raw payloads from the upstream providers
pub struct DashboardAssembler {
    openweather: OpenWeatherClient,
    open_meteo: OpenMeteoClient,
    default_location: Location,
    forecast_hour: String,
}

impl DashboardAssembler {
    pub fn new(
        openweather: OpenWeatherClient,
        open_meteo: OpenMeteoClient,
        default_location: Location,
        forecast_hour: impl Into<String>,
    ) -> Self {
        Self {
            openweather,
            open_meteo,
            default_location,
            forecast_hour: forecast_hour.into(),
        }
    }

    /// Wire up both provider clients from configuration
    pub fn from_config(config: &SafeBreatheConfig) -> AnyResult<Self> {
        let client = crate::http::client_from_config(&config.upstream)?;
        let openweather = OpenWeatherClient::new(
            client.clone(),
            config.upstream.openweather_base_url.clone(),
            config.upstream.openweather_api_key.clone(),
            config.defaults.locale,
        );
        let open_meteo = OpenMeteoClient::new(
            client,
            config.upstream.air_quality_base_url.clone(),
            config.upstream.geocoding_base_url.clone(),
        );
        let default_location = Location::new(
            config.defaults.latitude,
            config.defaults.longitude,
            config.defaults.location_name.clone(),
        );
        Ok(Self::new(
            openweather,
            open_meteo,
            default_location,
            config.defaults.forecast_hour.clone(),
        ))
    }

    /// Build the payload for a query. Never fails; failures end up in `error`.
    #[instrument(skip(self))]
    pub async fn assemble(&self, query: &LocationQuery) -> RawPayload {
        let start_time = Instant::now();

        let location = match self.resolve(query).await {
            Ok(location) => location,
            Err(payload) => return payload,
        };

        let (weather, pollution, forecast, exposure) = futures::join!(
            self.openweather.current_weather(&location),
            self.openweather.air_pollution(&location),
            self.openweather.daily_forecast(&location, &self.forecast_hour),
            self.open_meteo.exposure(&location),
        );

        let weather = log_failure("weather", weather);
        let pollution = log_failure("pollution", pollution);
        let forecast = log_failure("forecast", forecast);
        let exposure = log_failure("UV and pollen", exposure).unwrap_or_default();

        let (Some(weather), Some(pollution)) = (weather, pollution) else {
            return RawPayload::failed(RETRIEVAL_FAILED);
        };

        let CurrentWeather {
            reading,
            place_name,
        } = weather;

        let mut location = location;
        if location.name.trim().is_empty() {
            let coordinates = location.format_coordinates();
            location.name = place_name.unwrap_or(coordinates);
        }

        info!(
            "Assembled payload for {} in {:.3}s",
            location.name,
            start_time.elapsed().as_secs_f64()
        );

        RawPayload {
            weather: Some(reading),
            pollution: Some(pollution),
            uv: exposure.uv,
            pollen: exposure.pollen,
            // consumers expect a list, possibly empty
            forecast: Some(forecast.unwrap_or_default()),
            location: Some(RawLocation::Place(location)),
            error: None,
        }
    }

    /// Turn a query into coordinates, or into the payload to answer with
    async fn resolve(&self, query: &LocationQuery) -> std::result::Result<Location, RawPayload> {
        match query {
            LocationQuery::Default => Ok(self.default_location.clone()),
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => Ok(Location::new(*latitude, *longitude, String::new())),
            LocationQuery::City(city) => match self.open_meteo.geocode(city).await {
                Ok(Some(location)) => Ok(location),
                Ok(None) => Err(RawPayload::failed(format!("City not found: {city}"))),
                Err(e) => {
                    warn!("Geocoding '{}' failed: {:#}", city, e);
                    Err(RawPayload::failed(RETRIEVAL_FAILED))
                }
            },
        }
    }
}

fn log_failure<T>(what: &str, result: AnyResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to retrieve {}: {:#}", what, e);
            None
        }
    }
}

/// In-process payload source backed by a [`DashboardAssembler`]
#[derive(Clone)]
pub struct LocalPayloadSource {
    assembler: Arc<DashboardAssembler>,
}

impl LocalPayloadSource {
    #[must_use]
    pub fn new(assembler: Arc<DashboardAssembler>) -> Self {
        Self { assembler }
    }
}

#[async_trait]
impl PayloadSource for LocalPayloadSource {
    async fn fetch(&self, query: &LocationQuery) -> crate::Result<RawPayload> {
        Ok(self.assembler.assemble(query).await)
    }
}
