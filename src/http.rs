//! Shared HTTP client construction

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::UpstreamConfig;

const USER_AGENT: &str = concat!("SafeBreathe/", env!("CARGO_PKG_VERSION"));

/// Build a client that retries transient failures with exponential backoff
pub fn build_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Client configured from the upstream section
pub fn client_from_config(config: &UpstreamConfig) -> Result<ClientWithMiddleware> {
    build_client(
        Duration::from_secs(config.timeout_seconds.into()),
        config.max_retries,
    )
}
