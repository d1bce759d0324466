//! Runtime configuration.
//!
//! The command line carries only the connect descriptor; everything else is
//! taken from environment variables:
//! - `ORADASH_INTERVAL` - refresh interval in whole seconds (default: 10)
//! - `ORADASH_LOG` - append diagnostics to this file (default: no logging)

use std::path::PathBuf;
use std::time::Duration;

pub const INTERVAL_ENV: &str = "ORADASH_INTERVAL";
pub const LOG_ENV: &str = "ORADASH_LOG";

/// Default pause between two refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Error type for configuration parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value, reason } => {
                write!(f, "invalid {}='{}': {}", var, value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub refresh_interval: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            log_file: None,
        }
    }
}

impl Config {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(INTERVAL_ENV) {
            config.refresh_interval = parse_interval(&raw)?;
        }

        config.log_file = lookup(LOG_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        var: INTERVAL_ENV,
        value: raw.to_string(),
        reason,
    };

    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("must be at least 1 second".to_string()));
    }
    Ok(Duration::from_secs(secs))
}
