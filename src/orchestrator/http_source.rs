//! Payload source backed by the `/dashboard-data` endpoint

use std::time::Instant;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use super::PayloadSource;
use crate::config::SafeBreatheConfig;
use crate::models::{LocationQuery, RawPayload};
use crate::{Result, SafeBreatheError};

/// Fetches raw payloads from a running SafeBreathe service
pub struct HttpPayloadSource {
    client: ClientWithMiddleware,
    base_url: String,
}

impl HttpPayloadSource {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Source pointed at `server.dashboard_base_url`
    pub fn from_config(config: &SafeBreatheConfig) -> AnyResult<Self> {
        let client = crate::http::client_from_config(&config.upstream)?;
        Ok(Self::new(client, config.server.dashboard_base_url.clone()))
    }

    /// Endpoint URL for a query
    #[must_use]
    pub fn url_for(&self, query: &LocationQuery) -> String {
        let params = query.to_query_string();
        if params.is_empty() {
            format!("{}/dashboard-data", self.base_url)
        } else {
            format!("{}/dashboard-data?{params}", self.base_url)
        }
    }
}

#[async_trait]
impl PayloadSource for HttpPayloadSource {
    #[instrument(skip(self))]
    async fn fetch(&self, query: &LocationQuery) -> Result<RawPayload> {
        let url = self.url_for(query);
        debug!("Requesting dashboard data from {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Dashboard request failed: {}", e);
            SafeBreatheError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            // an upstream failure arrives as a 200 payload carrying `error`
            warn!("Dashboard endpoint answered {}", status);
            return Err(SafeBreatheError::transport(format!(
                "Unexpected response from {url}: HTTP {status}"
            )));
        }

        let payload: RawPayload = response.json().await.map_err(|e| {
            warn!("Undecodable dashboard payload: {}", e);
            SafeBreatheError::transport(e.to_string())
        })?;
        info!(
            "Received dashboard payload in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn source() -> HttpPayloadSource {
        let client = crate::http::build_client(Duration::from_secs(1), 0).unwrap();
        HttpPayloadSource::new(client, "http://127.0.0.1:8000/")
    }

    #[test]
    fn test_url_for_default_query() {
        assert_eq!(
            source().url_for(&LocationQuery::Default),
            "http://127.0.0.1:8000/dashboard-data"
        );
    }

    #[test]
    fn test_url_for_city_query() {
        assert_eq!(
            source().url_for(&LocationQuery::City("Mulhouse".into())),
            "http://127.0.0.1:8000/dashboard-data?city=Mulhouse"
        );
    }
}
