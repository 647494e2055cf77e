//! Runtime configuration.
//!
//! # Responsibility
//! - Hold the storage backend, data location and logging settings.
//! - Resolve defaults and build the configured `TaskStore`.
//!
//! # Invariants
//! - The resolved log directory is always absolute.

use crate::logging::default_log_level;
use crate::repo::json_store::{JsonTaskStore, DEFAULT_TASK_FILE};
use crate::repo::sqlite_store::SqliteTaskStore;
use crate::repo::{StoreResult, TaskStore};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default SQLite database location, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "data/tasks.db";

const LOG_DIR_NAME: &str = "logs";

/// Persistence backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Pretty-printed JSON snapshot file.
    #[default]
    Json,
    /// SQLite database with versioned schema.
    Sqlite,
}

impl StorageBackend {
    fn default_path(self) -> &'static str {
        match self {
            Self::Json => DEFAULT_TASK_FILE,
            Self::Sqlite => DEFAULT_DB_FILE,
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(format!("unsupported backend `{other}`; expected json|sqlite")),
        }
    }
}

/// Application settings resolved from flags and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: StorageBackend,
    /// Snapshot path. `None` uses the backend default under `data/`.
    pub data_path: Option<PathBuf>,
    /// Log level. `None` uses the build-mode default.
    pub log_level: Option<String>,
    /// Log directory. `None` uses `logs/` next to the data file.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Effective snapshot path.
    pub fn data_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.backend.default_path()))
    }

    /// Effective log level.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Effective absolute log directory, resolved against `cwd`.
    pub fn log_dir(&self, cwd: &Path) -> PathBuf {
        let dir = match &self.log_dir {
            Some(dir) => dir.clone(),
            None => {
                let data_path = self.data_path();
                data_path
                    .parent()
                    .map(|parent| parent.join(LOG_DIR_NAME))
                    .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME))
            }
        };
        if dir.is_absolute() {
            dir
        } else {
            cwd.join(dir)
        }
    }

    /// Builds the configured store.
    pub fn open_store(&self) -> StoreResult<Box<dyn TaskStore>> {
        let path = self.data_path();
        Ok(match self.backend {
            StorageBackend::Json => Box::new(JsonTaskStore::new(path)),
            StorageBackend::Sqlite => Box::new(SqliteTaskStore::open(path)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, StorageBackend};
    use std::path::{Path, PathBuf};

    #[test]
    fn defaults_follow_backend() {
        let json = AppConfig::default();
        assert_eq!(json.data_path(), PathBuf::from("data/task.json"));

        let sqlite = AppConfig {
            backend: StorageBackend::Sqlite,
            ..AppConfig::default()
        };
        assert_eq!(sqlite.data_path(), PathBuf::from("data/tasks.db"));
    }

    #[test]
    fn log_dir_defaults_next_to_data_and_is_absolute() {
        let cwd = Path::new("/work");
        let config = AppConfig::default();
        assert_eq!(config.log_dir(cwd), PathBuf::from("/work/data/logs"));

        let explicit = AppConfig {
            log_dir: Some(PathBuf::from("/var/log/mininotion")),
            ..AppConfig::default()
        };
        assert_eq!(explicit.log_dir(cwd), PathBuf::from("/var/log/mininotion"));
    }

    #[test]
    fn log_level_prefers_explicit_value_over_build_default() {
        let config = AppConfig::default();
        assert_eq!(config.log_level(), crate::logging::default_log_level());

        let explicit = AppConfig {
            log_level: Some("warn".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(explicit.log_level(), "warn");
    }

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<StorageBackend>(), Ok(StorageBackend::Sqlite));
        assert_eq!("json".parse::<StorageBackend>(), Ok(StorageBackend::Json));
        assert!("yaml".parse::<StorageBackend>().is_err());
    }
}
