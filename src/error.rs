//! Error types for placepick

use crate::session::Navigation;
use thiserror::Error;

/// Main error type for placepick operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid location record: {0}")]
    InvalidLocation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Session error: {0}")]
    Session(String),

    /// The session guard wants the caller to navigate elsewhere
    #[error("Redirect required: {}", .0.path())]
    AuthRedirect(Navigation),
}

/// Result type alias for placepick operations
pub type Result<T> = std::result::Result<T, Error>;
