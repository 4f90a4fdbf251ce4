//! Resolved locations
//!
//! A `ResolvedLocation` is the confirmed, form-owned location value. The
//! coordinate pair is stored as a single optional `Coordinates` so latitude
//! can never be present without longitude.

pub mod resolver;

use crate::error::Error;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

pub use resolver::{CityOverride, SelectionResolver};

/// The confirmed location value held by a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "LocationRecord", try_from = "LocationRecord")]
pub struct ResolvedLocation {
    pub place_name: String,
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
}

impl ResolvedLocation {
    /// The empty location a form starts with
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|c| c.lng)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Text for the "current selection" indicator
    ///
    /// None unless both a place name and a coordinate pair are present.
    pub fn selection_label(&self) -> Option<String> {
        let coords = self.coordinates?;
        if self.place_name.is_empty() {
            return None;
        }
        Some(format!(
            "{} ({:.4}, {:.4})",
            self.place_name, coords.lat, coords.lng
        ))
    }
}

/// A partial update to a `ResolvedLocation`; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPatch {
    pub place_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl LocationPatch {
    pub fn coordinates(coords: Coordinates) -> Self {
        Self {
            coordinates: Some(coords),
            ..Self::default()
        }
    }

    pub fn place_name(name: impl Into<String>) -> Self {
        Self {
            place_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(self, location: &mut ResolvedLocation) {
        if let Some(place_name) = self.place_name {
            location.place_name = place_name;
        }
        if let Some(city) = self.city {
            location.city = city;
        }
        if let Some(country) = self.country {
            location.country = country;
        }
        if let Some(coords) = self.coordinates {
            location.coordinates = Some(coords);
        }
    }
}

/// Wire form of a `ResolvedLocation`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationRecord {
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

impl From<ResolvedLocation> for LocationRecord {
    fn from(location: ResolvedLocation) -> Self {
        Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
            place_name: location.place_name,
            city: location.city,
            country: location.country,
        }
    }
}

impl TryFrom<LocationRecord> for ResolvedLocation {
    type Error = Error;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        let coordinates = match (record.latitude, record.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            (None, None) => None,
            _ => {
                return Err(Error::InvalidLocation(
                    "latitude and longitude must be given together".to_string(),
                ))
            }
        };
        Ok(Self {
            place_name: record.place_name,
            city: record.city,
            country: record.country,
            coordinates,
        })
    }
}
