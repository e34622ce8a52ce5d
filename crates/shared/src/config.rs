//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Concurrency settings for per-deposit/per-party serialization.
    #[serde(default)]
    pub locking: LockingConfig,
}

/// Settings for the bounded lock acquisition used to serialize mutations
/// per deposit and per party.
#[derive(Debug, Clone, Deserialize)]
pub struct LockingConfig {
    /// Number of acquisition attempts before giving up with a
    /// retryable conflict error.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff between attempts, in milliseconds. Doubled per attempt.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_ms() -> u64 {
    10
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locking: LockingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from config files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROPLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
