//! Dashboard view state
//!
//! A single slot holding either nothing, the latest view model, or the latest
//! failure. Every fetch takes a [`RequestTicket`]; only the ticket issued last may
//! replace the slot, so a slow response for an old query can never overwrite a
//! newer one.
//!
//! Failure policy is clear-on-error: an accepted failure replaces whatever view
//! was shown before.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::FetchFailure;
use crate::view::UnifiedViewModel;

/// Sequence number handed out for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Result of the most recent accepted fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing fetched yet
    Empty,
    Ready(Arc<UnifiedViewModel>),
    Failed(FetchFailure),
}

/// Snapshot published to subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Latest ticket handed out
    pub issued: u64,
    /// A fetch for `issued` is still in flight
    pub loading: bool,
    pub outcome: Outcome,
}

impl DashboardState {
    #[must_use]
    pub fn view(&self) -> Option<&UnifiedViewModel> {
        match &self.outcome {
            Outcome::Ready(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Single-writer holder of the dashboard state
#[derive(Debug)]
pub struct DashboardStore {
    sender: watch::Sender<DashboardState>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DashboardState {
            issued: 0,
            loading: false,
            outcome: Outcome::Empty,
        });
        Self { sender }
    }

    /// Issue the next ticket and mark the store as loading.
    ///
    /// Any ticket issued earlier is superseded from this point on.
    pub fn begin(&self) -> RequestTicket {
        let mut issued = 0;
        self.sender.send_modify(|state| {
            state.issued += 1;
            state.loading = true;
            issued = state.issued;
        });
        debug!("Issued request ticket {}", issued);
        RequestTicket(issued)
    }

    /// Commit the outcome of a fetch.
    ///
    /// Returns `false`, leaving the state untouched, when `ticket` is not the latest.
    pub fn resolve(
        &self,
        ticket: RequestTicket,
        result: std::result::Result<UnifiedViewModel, FetchFailure>,
    ) -> bool {
        let accepted = self.sender.send_if_modified(|state| {
            if state.issued != ticket.0 {
                return false;
            }
            state.loading = false;
            state.outcome = match result {
                Ok(view) => Outcome::Ready(Arc::new(view)),
                Err(failure) => Outcome::Failed(failure),
            };
            true
        });

        if !accepted {
            debug!(
                "Discarding stale response for ticket {} (latest is {})",
                ticket.0,
                self.sender.borrow().issued
            );
        }
        accepted
    }

    /// Latest published state
    #[must_use]
    pub fn current(&self) -> DashboardState {
        self.sender.borrow().clone()
    }

    /// Receive every accepted change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.sender.subscribe()
    }
}
