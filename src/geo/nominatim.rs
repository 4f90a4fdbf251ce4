//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for search and reverse geocoding.
//! The usage policy requires an identifying User-Agent on every request.

use crate::error::{Error, Result};
use crate::geo::{AddressComponents, Coordinates, GeoBackend, LocationCandidate};
use serde::Deserialize;
use tracing::{debug, warn};

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: AddressComponents,
}

/// Nominatim reverse response
///
/// Points with no address (open sea) come back as 200 with only `error` set.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<AddressComponents>,
}

impl NominatimBackend {
    /// Create a backend talking to `base_url` (no trailing slash needed)
    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!("Nominatim GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))
    }
}

impl GeoBackend for NominatimBackend {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationCandidate>> {
        let url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        let candidates = places
            .into_iter()
            .filter_map(|place| match Self::parse_coords(&place.lat, &place.lon) {
                Ok((latitude, longitude)) => Some(LocationCandidate {
                    display_name: place.display_name,
                    latitude,
                    longitude,
                    address: place.address,
                }),
                Err(e) => {
                    warn!("Skipping candidate '{}': {}", place.display_name, e);
                    None
                }
            })
            .take(limit)
            .collect();

        Ok(candidates)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<LocationCandidate>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, coords.lat, coords.lng
        );

        let response = self.get(&url).await?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: NominatimReverse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        if let Some(reason) = result.error {
            debug!("Nominatim has no address at {:?}: {}", coords, reason);
            return Ok(None);
        }

        // The reverse hit is anchored to the requested point, not the place centroid
        Ok(Some(LocationCandidate {
            display_name: result.display_name.unwrap_or_default(),
            latitude: coords.lat,
            longitude: coords.lng,
            address: result.address.unwrap_or_default(),
        }))
    }
}
