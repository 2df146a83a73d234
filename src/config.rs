//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Each of the three binaries loads only
//! its own configuration struct.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Registry (CRM) service configuration.
///
/// Loaded once at startup via [`RegistryConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Directory holding the read-only data documents.
    pub data_dir: PathBuf,
    /// Directory holding the schema contract documents.
    pub schemas_dir: PathBuf,
}

impl RegistryConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `CRM_LISTEN_ADDR` is set but cannot be parsed
    /// as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            listen_addr: parse_listen_addr("CRM_LISTEN_ADDR", "0.0.0.0:8001")?,
            data_dir: parse_env_path("DATA_DIR", "data"),
            schemas_dir: parse_env_path("SCHEMAS_DIR", "schemas"),
        })
    }
}

/// Sensor (IoT) service configuration.
///
/// Loaded once at startup via [`SensorConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Directory holding the read-only data documents.
    pub data_dir: PathBuf,
    /// Directory holding the schema contract documents.
    pub schemas_dir: PathBuf,
}

impl SensorConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `IOT_LISTEN_ADDR` is set but cannot be parsed
    /// as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            listen_addr: parse_listen_addr("IOT_LISTEN_ADDR", "0.0.0.0:8002")?,
            data_dir: parse_env_path("DATA_DIR", "data"),
            schemas_dir: parse_env_path("SCHEMAS_DIR", "schemas"),
        })
    }
}

/// Aggregation (unified API) service configuration.
///
/// Loaded once at startup via [`AggregationConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Base URL of the registry (CRM) service.
    pub crm_url: String,
    /// Base URL of the sensor (IoT) service.
    pub iot_url: String,
    /// Per-call timeout for upstream requests.
    pub upstream_timeout: Duration,
    /// Directory holding the schema contract documents.
    pub schemas_dir: PathBuf,
}

impl AggregationConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `UNIFIED_LISTEN_ADDR` is set but cannot be
    /// parsed as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs: f64 = parse_env("UPSTREAM_TIMEOUT_SECS", 3.0);

        Ok(Self {
            listen_addr: parse_listen_addr("UNIFIED_LISTEN_ADDR", "0.0.0.0:4000")?,
            crm_url: std::env::var("CRM_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            iot_url: std::env::var("IOT_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            upstream_timeout: Duration::from_secs_f64(timeout_secs.max(0.0)),
            schemas_dir: parse_env_path("SCHEMAS_DIR", "schemas"),
        })
    }
}

/// Parses a listen address variable, defaulting when unset.
fn parse_listen_addr(key: &str, default: &str) -> anyhow::Result<SocketAddr> {
    Ok(std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()?)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Reads an environment variable as a path, defaulting when unset.
fn parse_env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
