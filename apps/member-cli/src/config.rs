//! Centralized configuration for member-cli.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than halfway through a command.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// How new member ids are minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdStrategy {
    /// Random v4 UUIDs
    Uuid,
    /// `{prefix}{n}` from a counter starting at 1
    Sequential,
}

impl IdStrategy {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("sequential") {
            Self::Sequential
        } else {
            Self::Uuid
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log format (default: pretty)
    pub log_format: LogFormat,
    /// Id strategy (default: uuid)
    pub id_strategy: IdStrategy,
    /// Prefix for sequential ids (default: "m-")
    pub id_prefix: String,
    /// JSON array of registrations applied before the command runs
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        let id_strategy =
            IdStrategy::from_str(&lookup("MEMBER_ID_STRATEGY").unwrap_or_else(|| "uuid".into()));

        let id_prefix = lookup("MEMBER_ID_PREFIX").unwrap_or_else(|| "m-".into());
        if id_prefix.trim().is_empty() {
            return Err(ConfigError {
                field: "MEMBER_ID_PREFIX",
                message: "Must not be blank when set".into(),
            });
        }

        let seed_file = lookup("MEMBER_SEED_FILE")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        if let Some(path) = &seed_file {
            if !path.is_file() {
                return Err(ConfigError {
                    field: "MEMBER_SEED_FILE",
                    message: format!("'{}' is not a readable file", path.display()),
                });
            }
        }

        Ok(Self {
            log_format,
            id_strategy,
            id_prefix,
            seed_file,
        })
    }

    /// Remind the operator that nothing outlives the process.
    pub fn warn_ephemeral_store(&self) {
        match &self.seed_file {
            Some(path) => tracing::warn!(
                seed = %path.display(),
                "Using the in-memory member store seeded from file; changes are discarded on exit."
            ),
            None => tracing::warn!(
                "Using an empty in-memory member store; set MEMBER_SEED_FILE to preload members."
            ),
        }
    }
}
