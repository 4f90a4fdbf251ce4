//! Shared fixtures for unit tests

use crate::error::{Error, Result};
use crate::form::LocationListener;
use crate::geo::{Coordinates, GeoBackend, LocationCandidate};
use crate::location::ResolvedLocation;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn candidate(display_name: &str, lat: f64, lng: f64, address: &[(&str, &str)]) -> LocationCandidate {
    LocationCandidate {
        display_name: display_name.to_string(),
        latitude: lat,
        longitude: lng,
        address: address
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// In-memory geocoder with canned answers and per-query latency
#[derive(Default)]
pub struct MockBackend {
    results: HashMap<String, Vec<LocationCandidate>>,
    delays: HashMap<String, Duration>,
    failing: bool,
    reverse_hit: Option<LocationCandidate>,
    reverse_delays: Mutex<Vec<Duration>>,
    pub searches: Mutex<Vec<String>>,
    pub reverses: Mutex<Vec<Coordinates>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_results(mut self, query: &str, results: Vec<LocationCandidate>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn with_reverse(mut self, hit: LocationCandidate) -> Self {
        self.reverse_hit = Some(hit);
        self
    }

    /// Latencies handed out to successive reverse calls, in order
    pub fn with_reverse_delays(self, delays: Vec<Duration>) -> Self {
        *self.reverse_delays.lock().unwrap() = delays;
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn reverse_calls(&self) -> Vec<Coordinates> {
        self.reverses.lock().unwrap().clone()
    }
}

impl GeoBackend for MockBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>> {
        self.searches.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing {
            return Err(Error::Geocoding("mock failure".to_string()));
        }
        let mut results = self.results.get(query).cloned().unwrap_or_default();
        results.truncate(limit);
        Ok(results)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<LocationCandidate>> {
        self.reverses.lock().unwrap().push(coords);
        let delay = {
            let mut delays = self.reverse_delays.lock().unwrap();
            if delays.is_empty() {
                None
            } else {
                Some(delays.remove(0))
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(Error::Geocoding("mock failure".to_string()));
        }
        Ok(self.reverse_hit.clone().map(|mut hit| {
            hit.latitude = coords.lat;
            hit.longitude = coords.lng;
            hit
        }))
    }
}

/// Listener that records every callback
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<FormEvent>>,
}

/// One recorded listener callback
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Changed(ResolvedLocation),
    Selected(ResolvedLocation),
}

impl RecordingListener {
    pub fn events(&self) -> Vec<FormEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: FormEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl LocationListener for RecordingListener {
    fn on_change(&self, location: &ResolvedLocation) {
        self.push(FormEvent::Changed(location.clone()));
    }

    fn on_location_select(&self, location: &ResolvedLocation) {
        self.push(FormEvent::Selected(location.clone()));
    }
}
