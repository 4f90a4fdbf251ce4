//! Live location search
//!
//! `LocationSearch` turns keystrokes into debounced suggestion lookups and
//! picked suggestions into form selections.
//!
//! Keystroke flow: `set_query` → `Debouncer` → `SuggestionFetcher` →
//! suggestions channel. Only the latest lookup may publish, so a slow early
//! response never replaces the suggestions of a later query.

pub mod debounce;
pub mod fetcher;
pub mod sequence;

pub use debounce::Debouncer;
pub use fetcher::SuggestionFetcher;
pub use sequence::SequenceGate;

use crate::form::LocationFormState;
use crate::geo::{GeoBackend, LocationCandidate};
use crate::location::{ResolvedLocation, SelectionResolver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Tunables for a search box
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub suggestion_limit: usize,
}

/// Search box state: query text, suggestions, pending lookup
pub struct LocationSearch<B> {
    fetcher: Arc<SuggestionFetcher<B>>,
    resolver: Arc<SelectionResolver>,
    form: LocationFormState,
    debouncer: Debouncer,
    query: String,
    just_selected: Arc<AtomicBool>,
    suggestions: Arc<watch::Sender<Vec<LocationCandidate>>>,
}

impl<B: GeoBackend + 'static> LocationSearch<B> {
    /// Must be created from within a tokio runtime
    ///
    /// A form that already carries a place name gets a lookup for it, as if
    /// it had just been typed.
    pub fn new(
        backend: Arc<B>,
        resolver: Arc<SelectionResolver>,
        form: LocationFormState,
        settings: SearchSettings,
    ) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        let query = form.value().place_name;

        let mut search = Self {
            fetcher: Arc::new(SuggestionFetcher::new(backend, settings.suggestion_limit)),
            resolver,
            form,
            debouncer: Debouncer::new(settings.debounce),
            query,
            just_selected: Arc::new(AtomicBool::new(false)),
            suggestions: Arc::new(suggestions),
        };
        if !search.query.trim().is_empty() {
            search.schedule_lookup();
        }
        search
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Suggestions currently on display
    pub fn suggestions(&self) -> Vec<LocationCandidate> {
        self.suggestions.borrow().clone()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<Vec<LocationCandidate>> {
        self.suggestions.subscribe()
    }

    /// Whether a debounced lookup is still waiting for the quiet period
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Handle a keystroke: record the text and (re)arm the lookup timer
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.schedule_lookup();
    }

    fn schedule_lookup(&mut self) {
        let query = self.query.clone();
        let fetcher = self.fetcher.clone();
        let suggestions = self.suggestions.clone();
        let just_selected = self.just_selected.clone();

        self.debouncer.schedule(move || {
            if just_selected.swap(false, Ordering::SeqCst) {
                debug!("Skipping lookup right after selection");
                return;
            }

            if query.trim().is_empty() {
                fetcher.invalidate();
                suggestions.send_replace(Vec::new());
                return;
            }

            tokio::spawn(async move {
                if let Some(candidates) = fetcher.invoke_latest(&query).await {
                    suggestions.send_replace(candidates);
                }
            });
        });
    }

    /// Pick the suggestion at `index`
    ///
    /// Returns None (and changes nothing) for an out-of-range index.
    pub fn select(&mut self, index: usize) -> Option<ResolvedLocation> {
        let candidate = self.suggestions.borrow().get(index).cloned()?;
        info!("Selected location: {}", candidate.display_name);

        let resolved = self.resolver.resolve(&candidate);

        self.query = candidate.display_name;
        self.just_selected.store(true, Ordering::SeqCst);
        self.fetcher.invalidate();
        self.suggestions.send_replace(Vec::new());
        self.schedule_lookup();

        Some(self.form.select(resolved))
    }

    /// Empty the box, its suggestions and the form's location
    pub fn clear(&mut self) -> ResolvedLocation {
        self.debouncer.cancel();
        self.query.clear();
        self.just_selected.store(false, Ordering::SeqCst);
        self.fetcher.invalidate();
        self.suggestions.send_replace(Vec::new());
        self.form.clear()
    }
}
