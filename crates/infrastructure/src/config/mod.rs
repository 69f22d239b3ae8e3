//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `security`: Rate limiting and session signing
//! - `database`: Storage backend selection and SQLite settings
//! - `assets`: Static asset locations

mod assets;
mod database;
mod security;
mod server;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use assets::AssetConfig;
pub use database::{DatabaseConfig, StorageBackend};
pub use security::SecurityConfig;
pub use server::ServerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - relaxed defaults
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Static asset configuration
    #[serde(default)]
    pub assets: AssetConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., SCREENROOM_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("SCREENROOM")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
