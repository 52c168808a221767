//! Configuration Module
//!
//! This module defines all configuration structures for the validator key manager.
//! Configuration is loaded from TOML files and parsed using serde, then
//! selectively overridden from the environment.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "0.0.0.0"
/// port = 8080
/// request_timeout_ms = 10000
///
/// [database]
/// url = "sqlite://validators.db"
/// max_connections = 5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

/// HTTP server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on
/// - `request_timeout_ms`: Upper bound on how long a handler waits for storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 10_000,
        }
    }
}

/// Database configuration
///
/// # Fields
/// - `url`: Database connection URL (e.g., "sqlite://validators.db")
/// - `max_connections`: Size of the connection pool (in-memory databases always use one)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://validators.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults, so the service can be configured
    /// through the environment alone.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("invalid config file")?;
        Ok(config)
    }

    /// Apply `DATABASE_URL` and `PORT` from the process environment
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.api.port = port
                .parse()
                .with_context(|| format!("invalid PORT value: {port}"))?;
        }

        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            bail!("database url is required (set DATABASE_URL or [database] url)");
        }
        if self.database.max_connections == 0 {
            bail!("database max_connections must be at least 1");
        }
        Ok(())
    }
}
