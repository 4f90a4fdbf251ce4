//! Centralized constants for the placepick crate
//!
//! Values shared by several modules live here so the geocoder, the map
//! controller and the configuration defaults agree.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Catalogue backend serving sessions and logout
    pub const BACKEND_URL: &str = "http://localhost:8080";

    /// Current-user endpoint, relative to the backend
    pub const CURRENT_USER_PATH: &str = "/api/users/me";

    /// Logout endpoint, relative to the backend
    pub const LOGOUT_PATH: &str = "/api/logout";
}

/// Address component keys as reported by Nominatim
pub mod address {
    pub const CITY: &str = "city";
    pub const TOWN: &str = "town";
    pub const VILLAGE: &str = "village";
    pub const STATE: &str = "state";
    pub const COUNTRY: &str = "country";

    /// ISO 3166-2 subdivision code at admin level 4 (prefecture, state, ...)
    pub const SUBDIVISION_CODE: &str = "ISO3166-2-lvl4";

    /// Components tried in order when no city override applies
    pub const CITY_PRECEDENCE: [&str; 4] = [CITY, TOWN, VILLAGE, STATE];
}

/// Map viewport constants
pub mod map {
    /// Zoom used when the map first mounts
    pub const INITIAL_ZOOM: u8 = 5;

    /// Zoom used when recentering on the current coordinates
    pub const RECENTER_ZOOM: u8 = 12;

    /// Zoom used right after a search result is picked
    pub const SELECTION_ZOOM: u8 = 17;

    /// Center used while no coordinates are selected
    pub const DEFAULT_LAT: f64 = 20.0;
    pub const DEFAULT_LNG: f64 = 0.0;
}

/// Client-side navigation targets
pub mod routes {
    pub const SIGN_IN: &str = "/signin";
    pub const FORBIDDEN: &str = "/403";
}
