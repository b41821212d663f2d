//! Runtime configuration for task intake.
//!
//! # Responsibility
//! - Hold the document path, load policy and logging settings.
//! - Overlay environment variables on built-in defaults.
//!
//! # Invariants
//! - Defaults reproduce the lenient single-file behavior
//!   (`tasks_database.json`, `LoadPolicy::Lenient`).

use crate::logging::default_log_level;
use crate::repo::task_store::DEFAULT_DATABASE_PATH;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_DB_PATH: &str = "TASKBOOK_DB_PATH";
pub const ENV_LOAD_POLICY: &str = "TASKBOOK_LOAD_POLICY";
pub const ENV_LOG_LEVEL: &str = "TASKBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKBOOK_LOG_DIR";

/// How intake reacts to a task document it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Treat any unusable document as an empty list and keep going.
    #[default]
    Lenient,
    /// Refuse to write over a document that exists but cannot be decoded.
    Strict,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unsupported load policy `{other}`; expected lenient|strict"
            )),
        }
    }
}

impl Display for LoadPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// Task intake configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbookConfig {
    pub database_path: PathBuf,
    pub load_policy: LoadPolicy,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for TaskbookConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            load_policy: LoadPolicy::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TaskbookConfig {
    /// Defaults overlaid with `TASKBOOK_*` process environment variables.
    ///
    /// # Errors
    /// - Returns an error when `TASKBOOK_LOAD_POLICY` is unsupported.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(policy) = read(ENV_LOAD_POLICY) {
            config.load_policy = policy.parse()?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }
}
