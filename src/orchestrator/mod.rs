//! Request orchestration
//!
//! Resolves what the user asked for into one payload fetch, runs the payload
//! through the [`Aggregator`] and commits the outcome to the [`DashboardStore`]
//! under the ticket issued for that fetch.

pub mod http_source;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::aggregator::Aggregator;
use crate::models::{LocationQuery, RawPayload};
use crate::state::DashboardStore;
use crate::view::UnifiedViewModel;
use crate::{FetchFailure, Result};

pub use http_source::HttpPayloadSource;

/// Something that can produce the raw payload for a query
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Fetch the payload.
    ///
    /// A payload whose `error` is set is still `Ok`; `Err` means the source
    /// could not be reached or answered something undecodable.
    async fn fetch(&self, query: &LocationQuery) -> Result<RawPayload>;
}

/// Position reported by a geolocation collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves the current position of the user
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position>;
}

/// Drives fetch cycles against one payload source
pub struct Orchestrator<S> {
    source: S,
    aggregator: Aggregator,
    store: Arc<DashboardStore>,
}

impl<S: PayloadSource> Orchestrator<S> {
    #[must_use]
    pub fn new(source: S, aggregator: Aggregator) -> Self {
        Self::with_store(source, aggregator, Arc::new(DashboardStore::new()))
    }

    #[must_use]
    pub fn with_store(source: S, aggregator: Aggregator, store: Arc<DashboardStore>) -> Self {
        Self {
            source,
            aggregator,
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.store
    }

    /// Fetch and publish the dashboard for `query`.
    ///
    /// Returns whether the result was accepted into the store; `false` means a
    /// newer request superseded this one.
    ///
    /// # Errors
    ///
    /// Fails with a validation error, before any ticket is issued, when the query
    /// is invalid (blank city, out-of-range coordinates).
    #[instrument(skip(self))]
    pub async fn refresh(&self, query: LocationQuery) -> Result<bool> {
        let query = query.validated()?;
        let ticket = self.store.begin();
        let outcome = self.fetch_view(&query).await;
        if let Err(failure) = &outcome {
            warn!("Fetch for {:?} failed: {}", query, failure.message());
        }
        Ok(self.store.resolve(ticket, outcome))
    }

    /// Fetch the dashboard for the current position.
    ///
    /// A failed position lookup is published as [`FetchFailure::GeolocationDenied`];
    /// there is no fallback location.
    #[instrument(skip(self, geolocator))]
    pub async fn locate(&self, geolocator: &dyn Geolocator) -> bool {
        let ticket = self.store.begin();

        let outcome = match geolocator.current_position().await {
            Ok(position) => {
                info!(
                    "Located user at {:.4}, {:.4}",
                    position.latitude, position.longitude
                );
                let query = LocationQuery::Coordinates {
                    latitude: position.latitude,
                    longitude: position.longitude,
                };
                match query.validated() {
                    Ok(query) => self.fetch_view(&query).await,
                    Err(e) => {
                        warn!("Geolocator returned an invalid position: {}", e);
                        Err(FetchFailure::GeolocationDenied)
                    }
                }
            }
            Err(e) => {
                warn!("Geolocation failed: {}", e);
                Err(FetchFailure::GeolocationDenied)
            }
        };

        self.store.resolve(ticket, outcome)
    }

    async fn fetch_view(
        &self,
        query: &LocationQuery,
    ) -> std::result::Result<UnifiedViewModel, FetchFailure> {
        let payload = self
            .source
            .fetch(query)
            .await
            .map_err(|e| FetchFailure::from(&e))?;
        self.aggregator
            .aggregate(&payload)
            .map_err(|e| FetchFailure::from(&e))
    }
}
