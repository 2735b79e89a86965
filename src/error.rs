//! Error types for fleetdash
//!
//! Uses `thiserror` for ergonomic error definitions. The fetch path only ever
//! produces [`DashError::Fetch`]; the remaining variants belong to startup
//! (configuration, terminal setup, file I/O).

use std::io;
use thiserror::Error;

/// Prefix shown in front of every fetch failure on the dashboard.
pub const FETCH_BANNER_PREFIX: &str = "Error fetching servers data: ";

/// Main error type for fleetdash operations
#[derive(Error, Debug)]
pub enum DashError {
    /// Reading the server-records table failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Configuration parsing or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal setup or drawing error
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for fleetdash operations
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Build a fetch error from anything printable.
    pub fn fetch(msg: impl std::fmt::Display) -> Self {
        DashError::Fetch(msg.to_string())
    }

    /// The underlying message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            DashError::Fetch(msg) | DashError::Config(msg) | DashError::Terminal(msg) => {
                msg.clone()
            }
            DashError::Io(e) => e.to_string(),
        }
    }

    /// Text for the dashboard banner.
    ///
    /// Fetch failures read `Error fetching servers data: <message>`; other
    /// errors use their `Display` form.
    pub fn banner(&self) -> String {
        match self {
            DashError::Fetch(msg) => format!("{FETCH_BANNER_PREFIX}{msg}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_banner() {
        let err = DashError::fetch("network down");
        assert_eq!(err.banner(), "Error fetching servers data: network down");
        assert_eq!(err.message(), "network down");
    }

    #[test]
    fn test_non_fetch_banner_uses_display() {
        let err = DashError::Config("bad table".to_string());
        assert_eq!(err.banner(), "Configuration error: bad table");
    }

    #[test]
    fn test_io_conversion() {
        let err: DashError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, DashError::Io(_)));
        assert_eq!(err.message(), "gone");
    }
}
