//! placepick: location search and picking for catalogue forms
//!
//! A library and CLI tool that turns free-text place queries and map clicks
//! into confirmed form locations, backed by a Nominatim-compatible geocoder.
//!
//! ## Features
//!
//! - Debounced live suggestions where only the latest lookup may publish
//! - Candidate resolution with a configurable city override table
//! - Map viewport sync and marker drag with reverse geocoding
//! - Session client and route guard for the catalogue backend
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use placepick::geo::LocationCandidate;
//! use placepick::location::SelectionResolver;
//!
//! let candidate = LocationCandidate {
//!     display_name: "Ueno Park, Taito, Tokyo, Japan".to_string(),
//!     latitude: 35.7148,
//!     longitude: 139.7734,
//!     address: [("country".to_string(), "Japan".to_string())].into(),
//! };
//!
//! let resolved = SelectionResolver::default().resolve(&candidate);
//! assert_eq!(resolved.city, "Tokyo");
//! assert_eq!(resolved.country, "Japan");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod geo;
pub mod location;
pub mod map;
pub mod picker;
pub mod search;
pub mod server;
pub mod session;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use form::{LocationFormState, LocationListener};
pub use geo::{Coordinates, GeoBackend, LocationCandidate};
pub use location::{ResolvedLocation, SelectionResolver};
pub use picker::LocationPicker;
pub use session::{AuthGuard, SessionClient};
