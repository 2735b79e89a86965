//! Configuration module for fleetdash
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all optional values. Command-line flags and
//! environment variables are layered on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DashError, Result};

/// Table read when none is configured
pub const DEFAULT_TABLE: &str = "servers";

/// Default redraw/input poll interval in milliseconds
pub const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Main configuration structure for fleetdash
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote data store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Terminal UI configuration
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DashError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::parse_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn parse_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| DashError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Validate the configuration
    ///
    /// A missing store URL or key is deliberately not checked here: it is
    /// reported by the first fetch instead.
    pub fn validate(&self) -> Result<()> {
        if self.store.table.trim().is_empty() {
            return Err(DashError::Config("Table name cannot be empty".to_string()));
        }

        if self.store.timeout_secs == Some(0) {
            return Err(DashError::Config(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(DashError::Config("Tick rate cannot be 0".to_string()));
        }

        Ok(())
    }

    /// Write configuration to a TOML file
    ///
    /// Uses atomic write (temp file + rename) to prevent corruption.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| DashError::Config(format!("Failed to serialize config: {}", e)))?;

        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_str).map_err(|e| {
            DashError::Config(format!("Failed to write temp config file: {}", e))
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            DashError::Config(format!("Failed to rename config file: {}", e))
        })?;

        Ok(())
    }
}

/// Remote data store (PostgREST / Supabase) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Table holding one row per server
    pub table: String,

    /// Request timeout in seconds (None waits indefinitely)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: None,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json)
    pub format: LogFormat,

    /// Log file path. The dashboard discards logs when unset since it owns the terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,

    /// JSON format
    Json,
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll / redraw interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}
