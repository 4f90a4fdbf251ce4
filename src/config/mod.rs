//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/placepick/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::location::resolver::{default_city_overrides, CityOverride};
use crate::map::MapSettings;
use crate::search::SearchSettings;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Search box behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Map viewport settings
    #[serde(default)]
    pub map: MapConfig,

    /// Catalogue backend (sessions)
    #[serde(default)]
    pub session: SessionConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Place resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of suggestions per lookup
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

/// Search box behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a lookup fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Map viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,

    #[serde(default = "default_recenter_zoom")]
    pub recenter_zoom: u8,

    #[serde(default = "default_selection_zoom")]
    pub selection_zoom: u8,

    /// Center shown while nothing is selected
    #[serde(default = "default_lat")]
    pub default_lat: f64,

    #[serde(default = "default_lng")]
    pub default_lng: f64,
}

/// Catalogue backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Place resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Checked in order; the first match forces its city
    #[serde(default = "default_city_overrides")]
    pub city_overrides: Vec<CityOverride>,
}

// Default value functions for serde
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_initial_zoom() -> u8 {
    DEFAULT_INITIAL_ZOOM
}
fn default_recenter_zoom() -> u8 {
    DEFAULT_RECENTER_ZOOM
}
fn default_selection_zoom() -> u8 {
    DEFAULT_SELECTION_ZOOM
}
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lng() -> f64 {
    DEFAULT_LNG
}
fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_zoom: default_initial_zoom(),
            recenter_zoom: default_recenter_zoom(),
            selection_zoom: default_selection_zoom(),
            default_lat: default_lat(),
            default_lng: default_lng(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            city_overrides: default_city_overrides(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "suggestion_limit"] => Some(self.geocoder.suggestion_limit.to_string()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),

            ["map", "initial_zoom"] => Some(self.map.initial_zoom.to_string()),
            ["map", "recenter_zoom"] => Some(self.map.recenter_zoom.to_string()),
            ["map", "selection_zoom"] => Some(self.map.selection_zoom.to_string()),
            ["map", "default_lat"] => Some(self.map.default_lat.to_string()),
            ["map", "default_lng"] => Some(self.map.default_lng.to_string()),

            ["session", "backend_url"] => Some(self.session.backend_url.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => {
                self.geocoder.base_url = value.to_string();
            }
            ["geocoder", "user_agent"] => {
                self.geocoder.user_agent = value.to_string();
            }
            ["geocoder", "suggestion_limit"] => {
                self.geocoder.suggestion_limit = parse_value(key, value)?;
            }

            ["search", "debounce_ms"] => {
                self.search.debounce_ms = parse_value(key, value)?;
            }

            ["map", "initial_zoom"] => {
                self.map.initial_zoom = parse_value(key, value)?;
            }
            ["map", "recenter_zoom"] => {
                self.map.recenter_zoom = parse_value(key, value)?;
            }
            ["map", "selection_zoom"] => {
                self.map.selection_zoom = parse_value(key, value)?;
            }
            ["map", "default_lat"] => {
                self.map.default_lat = parse_value(key, value)?;
            }
            ["map", "default_lng"] => {
                self.map.default_lng = parse_value(key, value)?;
            }

            ["session", "backend_url"] => {
                self.session.backend_url = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.suggestion_limit",
            "search.debounce_ms",
            "map.initial_zoom",
            "map.recenter_zoom",
            "map.selection_zoom",
            "map.default_lat",
            "map.default_lng",
            "session.backend_url",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.search.debounce_ms),
            suggestion_limit: self.geocoder.suggestion_limit,
        }
    }

    pub fn map_settings(&self) -> MapSettings {
        MapSettings {
            initial_zoom: self.map.initial_zoom,
            recenter_zoom: self.map.recenter_zoom,
            selection_zoom: self.map.selection_zoom,
            default_center: Coordinates::new(self.map.default_lat, self.map.default_lng),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
