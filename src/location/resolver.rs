//! Candidate resolution
//!
//! Turns geocoder output into a `ResolvedLocation`. City names go through an
//! ordered override table before the usual component precedence, because
//! some places (Tokyo's wards, for one) report no usable `city` component.

use crate::constants::address::{CITY_PRECEDENCE, COUNTRY, STATE, SUBDIVISION_CODE};
use crate::geo::{Coordinates, GeoBackend, LocationCandidate};
use crate::location::ResolvedLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Forces a city name when a candidate matches any of the given predicates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityOverride {
    /// City to report on match
    pub city: String,

    /// Exact match against the ISO 3166-2 level 4 subdivision code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,

    /// Exact match against the `state` component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Substring match against the full display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name_contains: Option<String>,
}

impl CityOverride {
    /// The Tokyo metropolis entry
    pub fn tokyo() -> Self {
        Self {
            city: "Tokyo".to_string(),
            subdivision_code: Some("JP-13".to_string()),
            state: Some("Tokyo".to_string()),
            display_name_contains: Some("Tokyo".to_string()),
        }
    }

    pub fn matches(&self, candidate: &LocationCandidate) -> bool {
        let code_matches = self.subdivision_code.as_deref().is_some_and(|code| {
            candidate.address.get(SUBDIVISION_CODE).map(String::as_str) == Some(code)
        });
        let state_matches = self
            .state
            .as_deref()
            .is_some_and(|state| candidate.address.get(STATE).map(String::as_str) == Some(state));
        let name_matches = self
            .display_name_contains
            .as_deref()
            .is_some_and(|needle| candidate.display_name.contains(needle));

        code_matches || state_matches || name_matches
    }
}

/// Default override table
pub fn default_city_overrides() -> Vec<CityOverride> {
    vec![CityOverride::tokyo()]
}

/// Maps candidates and reverse-geocode hits to resolved locations
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    overrides: Vec<CityOverride>,
}

impl SelectionResolver {
    pub fn new(overrides: Vec<CityOverride>) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &[CityOverride] {
        &self.overrides
    }

    /// Resolve a picked search candidate
    pub fn resolve(&self, candidate: &LocationCandidate) -> ResolvedLocation {
        ResolvedLocation {
            place_name: candidate.display_name.clone(),
            city: self.city_for(candidate),
            country: Self::country_for(candidate),
            coordinates: Some(candidate.coordinates()),
        }
    }

    /// City for a candidate: first matching override, then component precedence
    pub fn city_for(&self, candidate: &LocationCandidate) -> String {
        if let Some(forced) = self.overrides.iter().find(|o| o.matches(candidate)) {
            debug!("City override '{}' applied to '{}'", forced.city, candidate.display_name);
            return forced.city.clone();
        }

        CITY_PRECEDENCE
            .iter()
            .find_map(|kind| candidate.component(kind))
            .unwrap_or_default()
            .to_string()
    }

    fn country_for(candidate: &LocationCandidate) -> String {
        candidate.component(COUNTRY).unwrap_or_default().to_string()
    }

    /// Merge a reverse-geocode hit for `coords` into `current`
    ///
    /// Coordinates always become `coords`. The place name only changes when
    /// the hit has one; city and country only change when it has an address,
    /// except that a matching city override always applies.
    pub fn merge_reverse(
        &self,
        current: &ResolvedLocation,
        coords: Coordinates,
        hit: &LocationCandidate,
    ) -> ResolvedLocation {
        let mut merged = current.clone();
        merged.coordinates = Some(coords);

        if !hit.display_name.is_empty() {
            merged.place_name = hit.display_name.clone();
        }
        if !hit.address.is_empty() || self.overrides.iter().any(|o| o.matches(hit)) {
            merged.city = self.city_for(hit);
        }
        if !hit.address.is_empty() {
            merged.country = Self::country_for(hit);
        }

        merged
    }

    /// Reverse geocode `coords`, logging and swallowing failures
    pub async fn reverse_hit<B: GeoBackend>(
        &self,
        backend: &B,
        coords: Coordinates,
    ) -> Option<LocationCandidate> {
        match backend.reverse(coords).await {
            Ok(Some(hit)) => Some(hit),
            Ok(None) => {
                debug!("No address found at {:?}", coords);
                None
            }
            Err(e) => {
                warn!("Reverse geocode failed: {}", e);
                None
            }
        }
    }

    /// Reverse geocode `coords` and merge the result into `current`
    ///
    /// Returns None (leaving the caller's value untouched) when the lookup
    /// fails or finds nothing.
    pub async fn resolve_reverse<B: GeoBackend>(
        &self,
        backend: &B,
        coords: Coordinates,
        current: &ResolvedLocation,
    ) -> Option<ResolvedLocation> {
        let hit = self.reverse_hit(backend, coords).await?;
        Some(self.merge_reverse(current, coords, &hit))
    }
}

impl Default for SelectionResolver {
    fn default() -> Self {
        Self::new(default_city_overrides())
    }
}
