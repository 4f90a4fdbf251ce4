//! Default configuration values
//!
//! Named constants for all tunable parameters

pub use crate::constants::api::{BACKEND_URL as DEFAULT_BACKEND_URL, NOMINATIM_URL as DEFAULT_GEOCODER_URL};
pub use crate::constants::map::{
    DEFAULT_LAT, DEFAULT_LNG, INITIAL_ZOOM as DEFAULT_INITIAL_ZOOM,
    RECENTER_ZOOM as DEFAULT_RECENTER_ZOOM, SELECTION_ZOOM as DEFAULT_SELECTION_ZOOM,
};

/// User-Agent sent to the geocoder
pub const DEFAULT_USER_AGENT: &str = concat!("placepick/", env!("CARGO_PKG_VERSION"));

/// Maximum number of suggestions shown
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Quiet period before a search lookup fires, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "placepick";
