//! Server shared state
//!
//! Holds configuration and the geocoder/resolver pair used by the handlers.

use crate::config::Config;
use crate::geo::GeoBackend;
use crate::location::SelectionResolver;
use crate::search::SuggestionFetcher;
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState<B> {
    pub config: Config,
    pub geocoder: Arc<B>,
    pub fetcher: SuggestionFetcher<B>,
    pub resolver: SelectionResolver,
}

impl<B: GeoBackend> AppState<B> {
    /// Create new application state; city overrides come from `config`
    pub fn new(config: Config, geocoder: Arc<B>) -> Self {
        let resolver = SelectionResolver::new(config.resolver.city_overrides.clone());
        let fetcher = SuggestionFetcher::new(geocoder.clone(), config.geocoder.suggestion_limit);
        Self {
            config,
            geocoder,
            fetcher,
            resolver,
        }
    }
}
