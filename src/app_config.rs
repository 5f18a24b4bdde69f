use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::database::connection::DatabaseLocation;

/// Application configuration module
/// This module handles the application configuration including loading
/// from a JSON file, applying command line / environment overrides and
/// validating the result before startup.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Relational store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// External rating service settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session cookie settings
    #[serde(default)]
    pub session: SessionConfig,

    /// bcrypt cost factor used when hashing new passwords
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Relational store configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection string (`sqlite://path`, a bare path or `:memory:`)
    #[serde(default = "String::new")]
    pub url: String,
}

/// Rating gateway configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Review statistics endpoint URL
    #[serde(default = "default_gateway_endpoint")]
    pub endpoint: String,

    /// API key; an empty key disables the gateway
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gateway_endpoint(),
            api_key: String::new(),
            timeout_secs: default_gateway_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Whether an API key is available
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Session cookie configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    /// Name of the cookie holding the opaque session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Sessions idle for longer than this are discarded
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Mark the cookie `Secure` (HTTPS deployments)
    #[serde(default)]
    pub secure_cookie: bool,

    /// Interval between expired-session sweeps
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            secure_cookie: false,
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_gateway_endpoint() -> String {
    "https://www.goodreads.com/book/review_counts.json".to_string()
}

fn default_gateway_timeout_secs() -> u64 {
    5
}

fn default_cookie_name() -> String {
    "bookreview_session".to_string()
}

// One day, matching a browser session for most users
fn default_idle_timeout_secs() -> u64 {
    86_400
}

fn default_purge_interval_secs() -> u64 {
    300
}

fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No configuration file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(anyhow!(
                "DATABASE_URL is not set: a store connection string is required"
            ));
        }
        DatabaseLocation::parse(&self.database.url)?;

        if !(4..=31).contains(&self.password_cost) {
            return Err(anyhow!(
                "password_cost must be between 4 and 31, got {}",
                self.password_cost
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(anyhow!("gateway.timeout_secs must be greater than zero"));
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(anyhow!("session.cookie_name cannot be empty"));
        }

        self.server
            .bind_addr
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid bind address: {}", self.server.bind_addr))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            gateway: GatewayConfig::default(),
            session: SessionConfig::default(),
            password_cost: default_password_cost(),
            log_level: LogLevel::default(),
        }
    }
}
