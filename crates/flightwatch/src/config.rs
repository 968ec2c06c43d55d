//! Configuration management for flightwatch.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::decode::{
    DEFAULT_AIRLINE_LOGO_BASE_URL, DEFAULT_COUNTRY_FLAG_BASE_URL, DEFAULT_PHOTO_BASE_URL,
};
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "flightwatch";

/// Default RadarBox data endpoint.
pub const DEFAULT_RADARBOX_BASE_URL: &str = "https://data.rb24.com";

/// Origin header the RadarBox endpoint expects.
pub const DEFAULT_RADARBOX_ORIGIN: &str = "https://www.radarbox.com";

/// Default FlightRadar24 feed endpoint.
pub const DEFAULT_FR24_FEED_URL: &str = "https://data-cloud.flightradar24.com/zones/fcgi/feed.js";

/// Default FlightRadar24 per-flight endpoint.
pub const DEFAULT_FR24_DETAIL_URL: &str = "https://data-live.flightradar24.com/clickhandler/";

/// Default poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 6000;

/// Default number of detail requests in flight per enrichment chunk.
pub const DEFAULT_ENRICH_CHUNK_SIZE: usize = 10;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTWATCH_`, sections split on `__`)
/// 2. TOML config file at `~/.config/flightwatch/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed endpoints and media URLs.
    pub feed: FeedConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,
    /// Selected-flight polling configuration.
    pub polling: PollingConfig,
    /// Bulk enrichment configuration.
    pub enrichment: EnrichmentConfig,
}

/// Which upstream provider answers queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// RadarBox positional feed.
    #[default]
    Radarbox,
    /// FlightRadar24 feed.
    Fr24,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Radarbox => write!(f, "radarbox"),
            Self::Fr24 => write!(f, "fr24"),
        }
    }
}

/// Feed-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Provider to query.
    pub provider: ProviderKind,
    /// RadarBox data endpoint.
    pub base_url: String,
    /// `Origin` header sent with RadarBox requests.
    pub origin: String,
    /// FlightRadar24 live feed URL.
    pub fr24_feed_url: String,
    /// FlightRadar24 per-flight URL.
    pub fr24_detail_url: String,
    /// Prefix for airframe photo URLs.
    pub photo_base_url: String,
    /// Prefix for airline logo URLs.
    pub airline_logo_base_url: String,
    /// Prefix for country flag URLs.
    pub country_flag_base_url: String,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header.
    pub user_agent: String,
}

/// Polling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between refreshes in milliseconds.
    pub interval_ms: u64,
}

/// Enrichment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Detail requests issued concurrently per chunk.
    pub chunk_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: DEFAULT_RADARBOX_BASE_URL.to_string(),
            origin: DEFAULT_RADARBOX_ORIGIN.to_string(),
            fr24_feed_url: DEFAULT_FR24_FEED_URL.to_string(),
            fr24_detail_url: DEFAULT_FR24_DETAIL_URL.to_string(),
            photo_base_url: DEFAULT_PHOTO_BASE_URL.to_string(),
            airline_logo_base_url: DEFAULT_AIRLINE_LOGO_BASE_URL.to_string(),
            country_flag_base_url: DEFAULT_COUNTRY_FLAG_BASE_URL.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("flightwatch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_ENRICH_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTWATCH_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "interval_ms must be greater than 0".to_string(),
            });
        }

        if self.enrichment.chunk_size == 0 {
            return Err(Error::ConfigValidation {
                message: "chunk_size must be greater than 0".to_string(),
            });
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        for (name, url) in [
            ("base_url", &self.feed.base_url),
            ("fr24_feed_url", &self.feed.fr24_feed_url),
            ("fr24_detail_url", &self.feed.fr24_detail_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be an http(s) URL, got {url:?}"),
                });
            }
        }

        Ok(())
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    /// Get the HTTP timeout as a Duration.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
