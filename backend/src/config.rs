//! Application configuration.
//!
//! Read from a YAML file (`BUDGET_TRACKER_CONFIG`, or `config.yaml` in the data directory),
//! with a few environment overrides on top. A missing file means defaults. Values that cannot
//! be used, such as a malformed UTC offset, fail at startup.

use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::money_management::MoneyManagementConfig;
use crate::storage::RetryPolicy;

pub const CONFIG_PATH_ENV: &str = "BUDGET_TRACKER_CONFIG";
pub const DATA_DIR_ENV: &str = "BUDGET_TRACKER_DATA_DIR";
pub const BIND_ENV: &str = "BUDGET_TRACKER_BIND";
pub const UTC_OFFSET_ENV: &str = "BUDGET_TRACKER_UTC_OFFSET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Per-attempt timeout for a storage call
    pub timeout_ms: u64,
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            max_attempts: 2,
            backoff_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// The one offset every day boundary is computed in, e.g. "+07:00"
    pub utc_offset: String,
    pub cors_origin: String,
    pub storage: StorageConfig,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_address: "127.0.0.1:3000".to_string(),
            utc_offset: "+07:00".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            storage: StorageConfig::default(),
            currency_symbol: String::new(),
        }
    }
}

/// ~/Documents/Budget Tracker, falling back to the home directory
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Budget Tracker")
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for environment values
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = match lookup(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_directory)
                .join("config.yaml"),
        };

        let mut config = if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            Self::from_yaml_file(&config_path)?
        } else {
            debug!("No configuration file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_overrides(&lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))
    }

    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind_address = bind;
        }
        if let Some(offset) = lookup(UTC_OFFSET_ENV) {
            self.utc_offset = offset;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.reference_offset()?;
        self.socket_addr()?;
        if self.storage.max_attempts == 0 {
            return Err(anyhow!("storage.max_attempts must be at least 1"));
        }
        Ok(())
    }

    pub fn reference_offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind_address '{}'. Use host:port, for example 127.0.0.1:3000", self.bind_address))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.storage.timeout_ms),
            self.storage.max_attempts,
            Duration::from_millis(self.storage.backoff_ms),
        )
    }

    pub fn money_config(&self) -> MoneyManagementConfig {
        MoneyManagementConfig {
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

/// Parse `+HH:MM` / `+HHMM` through chrono, plus the `Z` and `UTC` aliases
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let trimmed = input.trim();
    let invalid = || anyhow!("Invalid utc_offset '{}'. Use +HH:MM, for example +07:00", trimmed);

    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    trimmed.parse::<FixedOffset>().map_err(|_| invalid())
}
