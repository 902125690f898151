//! Tracing subscriber setup

use std::env;
use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if set, otherwise the configured level,
/// with HTTP client and server noise turned down.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    build_filter(env::var("RUST_LOG").ok().as_deref(), config)
}

fn build_filter(rust_log: Option<&str>, config: &LoggingConfig) -> EnvFilter {
    let mut directives = vec![
        "hyper=warn".to_string(),
        "reqwest=warn".to_string(),
        "reqwest_retry=warn".to_string(),
        "tower_http=info".to_string(),
    ];

    let base = match rust_log {
        Some(rust_log) => EnvFilter::new(rust_log),
        None => {
            directives.push(format!("safebreathe={}", config.level));
            EnvFilter::new(&config.level)
        }
    };

    directives
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(base, EnvFilter::add_directive)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let installed = if config.format == "json" {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(io::stdout)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(io::stdout))
            .try_init()
    };

    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
