//! Configuration management for the plant care backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with PLANT_CARE_ prefix

use chrono::{DateTime, NaiveDate, Utc};
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{Clock, FixedClock, SystemClock};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Where plants, users and notification centers are read from
    pub roster: RosterConfig,

    /// Where produced notifications are appended
    pub outbox: OutboxConfig,

    /// Care check settings
    #[serde(default)]
    pub check: CheckConfig,

    /// Plant identification settings
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RosterConfig {
    /// Path of the roster JSON file
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutboxConfig {
    /// Path of the outbox JSON file
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CheckConfig {
    /// Pin "today" to this date instead of the system clock
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Identification requests a non-staff user may make
    pub max_usage: u32,
}

/// Clock chosen from configuration
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for ConfiguredClock {
    fn today(&self) -> NaiveDate {
        match self {
            ConfiguredClock::System(clock) => clock.today(),
            ConfiguredClock::Fixed(clock) => clock.today(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        match self {
            ConfiguredClock::System(clock) => clock.now(),
            ConfiguredClock::Fixed(clock) => clock.now(),
        }
    }
}

impl CheckConfig {
    /// Clock for this run; `override_date` wins over the configured date
    pub fn clock(&self, override_date: Option<NaiveDate>) -> ConfiguredClock {
        match override_date.or(self.reference_date) {
            Some(date) => ConfiguredClock::Fixed(FixedClock(date)),
            None => ConfiguredClock::System(SystemClock),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PLANT_CARE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("roster.path", "data/roster.json")?
            .set_default("outbox.path", "data/outbox.json")?
            .set_default("ai.max_usage", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PLANT_CARE_ prefix)
            .add_source(
                Environment::with_prefix("PLANT_CARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { max_usage: 5 }
    }
}
