//! Error types and handling for the `SafeBreathe` core

use serde::Serialize;
use thiserror::Error;

/// Message shown for every failure that is not an upstream-reported error.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to reach the server.";

/// Main error type for the `SafeBreathe` library
#[derive(Error, Debug)]
pub enum SafeBreatheError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The upstream aggregation point answered with an error of its own
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// The upstream aggregation point could not be reached or answered garbage
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The position of the user could not be determined
    #[error("Geolocation error: {message}")]
    Geolocation { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SafeBreatheError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new geolocation error
    pub fn geolocation<S: Into<String>>(message: S) -> Self {
        Self::Geolocation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SafeBreatheError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SafeBreatheError::Upstream { message } => message.clone(),
            SafeBreatheError::Transport { .. } | SafeBreatheError::Geolocation { .. } => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            SafeBreatheError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SafeBreatheError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// Why a fetch cycle ended without a view model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FetchFailure {
    /// The payload carried an `error` field; shown verbatim
    Upstream(String),
    /// Network failure, timeout or undecodable response
    Transport,
    /// Position lookup failed or is unsupported
    GeolocationDenied,
}

impl FetchFailure {
    /// Text the presentation layer displays for this failure
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            FetchFailure::Upstream(message) => message,
            FetchFailure::Transport | FetchFailure::GeolocationDenied => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl From<&SafeBreatheError> for FetchFailure {
    fn from(err: &SafeBreatheError) -> Self {
        match err {
            SafeBreatheError::Upstream { message } => FetchFailure::Upstream(message.clone()),
            SafeBreatheError::Geolocation { .. } => FetchFailure::GeolocationDenied,
            _ => FetchFailure::Transport,
        }
    }
}
