//! Geocoding module
//!
//! Provides forward search (free text to candidates) and reverse geocoding
//! (coordinates to an address) behind the `GeoBackend` trait.

pub mod nominatim;

use crate::config::GeocoderConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address component kind (e.g. "city", "country") to its value
pub type AddressComponents = BTreeMap<String, String>;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// An unconfirmed geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCandidate {
    /// Full display name, e.g. "Paris, Île-de-France, France"
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: AddressComponents,
}

impl LocationCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Look up an address component, treating empty strings as absent
    pub fn component(&self, kind: &str) -> Option<&str> {
        self.address
            .get(kind)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Search for places matching a free-text query
    ///
    /// Returns at most `limit` candidates, most relevant first.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<LocationCandidate>>> + Send;

    /// Reverse geocode coordinates to the nearest addressable place
    ///
    /// Returns None when the service has no address for the point.
    fn reverse(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = Result<Option<LocationCandidate>>> + Send;
}

/// Build the geocoding backend described by the configuration
pub fn get_geocoder(config: &GeocoderConfig) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::with_base_url(&config.base_url, &config.user_agent)
}
