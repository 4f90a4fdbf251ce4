//! Suggestion fetching
//!
//! Wraps a `GeoBackend` so that lookups never fail from the caller's point
//! of view: errors are logged and become an empty suggestion list.

use crate::geo::{GeoBackend, LocationCandidate};
use crate::search::sequence::SequenceGate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bounded, failure-tolerant suggestion lookups
#[derive(Debug)]
pub struct SuggestionFetcher<B> {
    backend: Arc<B>,
    limit: usize,
    gate: SequenceGate,
}

impl<B: GeoBackend> SuggestionFetcher<B> {
    pub fn new(backend: Arc<B>, limit: usize) -> Self {
        Self {
            backend,
            limit,
            gate: SequenceGate::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Look up at most `limit` candidates for `query`
    ///
    /// Blank queries return immediately without touching the network.
    pub async fn invoke(&self, query: &str) -> Vec<LocationCandidate> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.backend.search(query, self.limit).await {
            Ok(mut candidates) => {
                candidates.truncate(self.limit);
                debug!("{} suggestion(s) for '{}'", candidates.len(), query);
                candidates
            }
            Err(e) => {
                warn!("Location search error for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    /// Like `invoke`, but returns None if a newer lookup started meanwhile
    pub async fn invoke_latest(&self, query: &str) -> Option<Vec<LocationCandidate>> {
        let ticket = self.gate.issue();
        let candidates = self.invoke(query).await;

        if self.gate.is_latest(ticket) {
            Some(candidates)
        } else {
            debug!("Discarding stale suggestions for '{}'", query);
            None
        }
    }

    /// Make every in-flight `invoke_latest` come back stale
    pub fn invalidate(&self) {
        self.gate.invalidate();
    }
}
