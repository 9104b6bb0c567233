use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub gmail: GmailConfig,
    pub trackers: Vec<TrackerConfig>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub quiet: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GmailConfig {
    pub access_token: String,
    pub api_url: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    /// "subscription" or "job"; anything else falls back to subscription.
    pub category: String,
    pub check_interval_seconds: Option<u64>,
    /// Snapshot destination; stdout when unset.
    pub output_file: Option<String>,
    /// Extra gate keywords for the subscription category. Absent means the
    /// single "subscription" keyword.
    pub keywords: Option<Vec<String>>,
}

// Default check interval in seconds (5 minutes)
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 300;

// Default number of recent messages fetched per scan
pub const DEFAULT_MAX_RESULTS: u32 = 25;

// Implement loading configuration
impl AppConfig {
    // Load config from defaults, then file (if exists), then environment variables
    #[allow(dead_code)]
    pub fn new() -> Result<Self, ConfigError> {
        Self::configure_defaults()?
            // Merge in config file if present
            .add_source(File::with_name("config").required(false))
            // Merge in environment variables
            // e.g. APP_GMAIL__ACCESS_TOKEN=... APP_LOG_LEVEL=...
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    // Load config from a specific file path
    #[allow(dead_code)]
    pub fn new_from_file(path: &str) -> Result<Self, ConfigError> {
        Self::configure_defaults()?
            .add_source(File::with_name(path).required(true))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn configure_defaults()
    -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder())
    }
}
