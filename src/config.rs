//! Configuration management for `SafeBreathe`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SafeBreatheError;
use crate::labels::Locale;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafeBreatheConfig {
    /// Upstream provider settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the OpenWeather data API
    #[serde(default = "default_openweather_base_url")]
    pub openweather_base_url: String,
    /// OpenWeather API key
    pub openweather_api_key: Option<String>,
    /// Base URL of the Open-Meteo air quality API (UV and pollen)
    #[serde(default = "default_air_quality_base_url")]
    pub air_quality_base_url: String,
    /// Base URL of the Open-Meteo geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where `HttpPayloadSource` finds the `/dashboard-data` endpoint
    #[serde(default = "default_dashboard_base_url")]
    pub dashboard_base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Name shown for the default location
    #[serde(default = "default_location_name")]
    pub location_name: String,
    /// Latitude of the default location
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Longitude of the default location
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Language of derived labels
    #[serde(default)]
    pub locale: Locale,
    /// Time slot of the 3-hourly forecast kept for each day
    #[serde(default = "default_forecast_hour")]
    pub forecast_hour: String,
}

// Default value functions
fn default_openweather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_dashboard_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_location_name() -> String {
    "Strasbourg".to_string()
}

fn default_latitude() -> f64 {
    48.5734
}

fn default_longitude() -> f64 {
    7.7521
}

fn default_forecast_hour() -> String {
    "12:00:00".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            openweather_base_url: default_openweather_base_url(),
            openweather_api_key: None,
            air_quality_base_url: default_air_quality_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dashboard_base_url: default_dashboard_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            location_name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            locale: Locale::default(),
            forecast_hour: default_forecast_hour(),
        }
    }
}

impl SafeBreatheConfig {
    /// Load configuration from `config_path`, or the default path when `None`,
    /// overlaid with `SAFEBREATHE__*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SAFEBREATHE__SERVER__PORT=9000 style overrides
        builder = builder.add_source(
            Environment::with_prefix("SAFEBREATHE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SafeBreatheConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("safebreathe").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.upstream.openweather_base_url.is_empty() {
            self.upstream.openweather_base_url = default_openweather_base_url();
        }
        if self.upstream.air_quality_base_url.is_empty() {
            self.upstream.air_quality_base_url = default_air_quality_base_url();
        }
        if self.upstream.geocoding_base_url.is_empty() {
            self.upstream.geocoding_base_url = default_geocoding_base_url();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.dashboard_base_url.is_empty() {
            self.server.dashboard_base_url = default_dashboard_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.location_name.is_empty() {
            self.defaults.location_name = default_location_name();
        }
        if self.defaults.forecast_hour.is_empty() {
            self.defaults.forecast_hour = default_forecast_hour();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.upstream.openweather_api_key {
            if api_key.is_empty() {
                return Err(SafeBreatheError::config(
                    "OpenWeather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(SafeBreatheError::config(
                    "OpenWeather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.upstream.timeout_seconds > 300 {
            return Err(
                SafeBreatheError::config("Upstream timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.upstream.max_retries > 10 {
            return Err(SafeBreatheError::config("Upstream max retries cannot exceed 10").into());
        }

        if !(-90.0..=90.0).contains(&self.defaults.latitude) {
            return Err(SafeBreatheError::config(
                "Default latitude must be between -90 and 90 degrees",
            )
            .into());
        }

        if !(-180.0..=180.0).contains(&self.defaults.longitude) {
            return Err(SafeBreatheError::config(
                "Default longitude must be between -180 and 180 degrees",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SafeBreatheError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SafeBreatheError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("OpenWeather", &self.upstream.openweather_base_url),
            ("Air quality", &self.upstream.air_quality_base_url),
            ("Geocoding", &self.upstream.geocoding_base_url),
            ("Dashboard", &self.server.dashboard_base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SafeBreatheError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if chrono::NaiveTime::parse_from_str(&self.defaults.forecast_hour, "%H:%M:%S").is_err() {
            return Err(SafeBreatheError::config(format!(
                "Invalid forecast hour '{}'. Expected HH:MM:SS",
                self.defaults.forecast_hour
            ))
            .into());
        }

        Ok(())
    }
}
