//! Configuration management for the pantry ledger server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with PANTRY_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::PlanningPolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Which ledger store backs the engine
    pub storage: StorageConfig,

    /// Reconciliation behavior
    pub reconcile: ReconcileConfig,

    /// Par policy
    pub planning: PlanningConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection before reporting the store unreachable
    pub acquire_timeout_secs: u64,

    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process-local ledger, lost on restart
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// How a count's read and write are tied together
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Conditional insert: the write only lands if on-hand is unchanged since the read
    #[default]
    Guarded,
    /// Read then append with no check; concurrent counts can interleave
    Unguarded,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconcileConfig {
    pub mode: ReconcileMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    /// Days of average usage held as par
    pub safety_multiplier: Decimal,
}

impl PlanningConfig {
    pub fn policy(&self) -> PlanningPolicy {
        PlanningPolicy::new(self.safety_multiplier)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PANTRY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PANTRY_ prefix)
            .add_source(
                Environment::with_prefix("PANTRY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("storage.backend", "postgres")?
            .set_default("reconcile.mode", "guarded")?
            .set_default("planning.safety_multiplier", "11")?
            .set_default("logging.json", false)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url is required when storage.backend = \"postgres\"".to_string(),
            ));
        }
        if self.planning.safety_multiplier <= Decimal::ZERO {
            return Err(ConfigError::Message(
                "planning.safety_multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
