//! Service settings loading from config.toml
//!
//! Settings are read once at startup. Every section is optional and falls back to
//! defaults, so the service runs without a settings file. Secrets never live here:
//! the JWT key, issuer and audience come from the environment (see `crate::auth`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener and CORS settings
    pub server: ServerSettings,
    /// Bean of the day rotation settings
    pub botd: BotdSettings,
    /// Seed data settings
    pub seed: SeedSettings,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Allowed CORS origins; empty mirrors the request origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// `[botd]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotdSettings {
    /// Seconds between rotation cycles (86400 for a daily cadence)
    pub interval_secs: u64,
}

impl Default for BotdSettings {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// `[seed]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Path of the JSON catalog feed loaded at startup
    pub path: PathBuf,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("AllTheBeans.json"),
        }
    }
}

impl Settings {
    /// Socket address the HTTP server binds to.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let address = format!("{}:{}", self.server.host, self.server.port);
        address.parse().map_err(|e| Error::Config {
            message: format!("Invalid bind address {address}: {e}"),
        })
    }

    /// Interval between bean of the day rotations.
    #[must_use]
    pub const fn botd_interval(&self) -> Duration {
        Duration::from_secs(self.botd.interval_secs)
    }

    /// Overrides values from environment variables.
    ///
    /// `CORS_ORIGINS` takes a comma-separated list and replaces the configured origins.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = parse_origins(&raw);
        }
        self
    }

    fn validate(self) -> Result<Self> {
        if self.botd.interval_secs == 0 {
            return Err(Error::Config {
                message: "botd.interval_secs must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }
}

/// Splits a comma-separated origin list, dropping blank entries.
#[must_use]
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid, or a
/// value is out of range.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads settings from `CONFIG_PATH` (or `./config.toml`), then applies environment
/// overrides. A missing file yields the defaults.
pub fn load_default_config() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No settings file at {}, using defaults", path);
        Settings::default()
    };
    Ok(settings.with_env_overrides())
}
