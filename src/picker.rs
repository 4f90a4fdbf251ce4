//! Location picker
//!
//! Wires one form, one search box and one map together around a shared
//! geocoder and resolver. This is the entry point a front-end drives.

use crate::config::Config;
use crate::form::LocationFormState;
use crate::geo::{Coordinates, GeoBackend, LocationCandidate};
use crate::location::{LocationPatch, ResolvedLocation, SelectionResolver};
use crate::map::{MapSettings, MapViewController, ViewportState};
use crate::search::{LocationSearch, SearchSettings};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct LocationPicker<B> {
    form: LocationFormState,
    search: LocationSearch<B>,
    map: MapViewController<B>,
}

impl<B: GeoBackend + 'static> LocationPicker<B> {
    pub fn new(
        backend: Arc<B>,
        resolver: Arc<SelectionResolver>,
        form: LocationFormState,
        search: SearchSettings,
        map: MapSettings,
    ) -> Self {
        Self {
            search: LocationSearch::new(backend.clone(), resolver.clone(), form.clone(), search),
            map: MapViewController::new(backend, resolver, form.clone(), map),
            form,
        }
    }

    /// Build a picker with settings and overrides taken from `config`
    pub fn from_config(backend: Arc<B>, form: LocationFormState, config: &Config) -> Self {
        let resolver = Arc::new(SelectionResolver::new(config.resolver.city_overrides.clone()));
        Self::new(
            backend,
            resolver,
            form,
            config.search_settings(),
            config.map_settings(),
        )
    }

    pub fn form(&self) -> &LocationFormState {
        &self.form
    }

    pub fn location(&self) -> ResolvedLocation {
        self.form.value()
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn suggestions(&self) -> Vec<LocationCandidate> {
        self.search.suggestions()
    }

    pub fn viewport(&self) -> ViewportState {
        self.map.viewport()
    }

    pub fn marker_position(&self) -> Coordinates {
        self.map.marker_position()
    }

    /// Keystroke in the search box
    pub fn type_query(&mut self, text: impl Into<String>) {
        self.search.set_query(text);
    }

    /// Pick a suggestion and zoom the map onto it
    pub fn select_suggestion(&mut self, index: usize) -> Option<ResolvedLocation> {
        let resolved = self.search.select(index)?;
        if let Some(coords) = resolved.coordinates {
            self.map.focus_selection(coords);
        }
        Some(resolved)
    }

    pub fn clear(&mut self) -> ResolvedLocation {
        let cleared = self.search.clear();
        self.map.sync();
        cleared
    }

    /// Marker dropped at `coords`; see `MapViewController::drag_end`
    pub fn drag_marker(&mut self, coords: Coordinates) -> JoinHandle<()> {
        self.map.drag_end(coords)
    }

    pub fn recenter(&mut self) -> bool {
        self.map.recenter()
    }

    /// Re-read the form after it was changed from outside the picker
    pub fn sync_map(&mut self) -> bool {
        self.map.sync()
    }

    /// Free-text edit of the place name field
    pub fn edit_place_name(&self, name: impl Into<String>) -> ResolvedLocation {
        self.form.update(LocationPatch::place_name(name))
    }

    /// Free-text edit of the city field
    pub fn edit_city(&self, city: impl Into<String>) -> ResolvedLocation {
        self.form.update(LocationPatch::city(city))
    }
}
