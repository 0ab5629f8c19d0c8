//! File-based runtime configuration.
//!
//! # Responsibility
//! - Describe where tasks and logs live and which storage key is used.
//! - Load overrides from an optional TOML file.
//!
//! # Invariants
//! - A missing config file yields defaults, not an error.
//! - `storage_key` is never empty after loading.

use crate::logging::default_log_level;
use crate::repo::task_repo::TASKS_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::EmptyStorageKey => write!(f, "storage_key must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::EmptyStorageKey => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasklistConfig {
    /// SQLite file holding the key-value table.
    pub db_path: PathBuf,
    /// Key the task blob is stored under.
    pub storage_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for TasklistConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            storage_key: TASKS_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TasklistConfig {
    /// Parses TOML text and validates the result.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }
}

/// Loads config from `path`, falling back to defaults when it does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<TasklistConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(TasklistConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TasklistConfig::from_toml_str(&text, path)
}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, TasklistConfig};
    use std::path::Path;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config =
            TasklistConfig::from_toml_str("db_path = \"/tmp/t.sqlite3\"", Path::new("t.toml"))
                .unwrap();
        assert_eq!(config.db_path, Path::new("/tmp/t.sqlite3"));
        assert_eq!(config.storage_key, "tasks");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let err = TasklistConfig::from_toml_str("storage_key = \" \"", Path::new("t.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStorageKey));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TasklistConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "storage_key = [").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
