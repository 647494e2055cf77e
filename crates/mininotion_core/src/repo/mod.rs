//! Task persistence contracts and backends.
//!
//! # Responsibility
//! - Define the snapshot-oriented `TaskStore` contract.
//! - Isolate file format and SQL details from service orchestration.
//!
//! # Invariants
//! - `save_tasks` replaces the whole persisted snapshot.
//! - Write paths call `Task::validate()` before persisting.
//! - Read paths reject undecodable persisted state instead of masking it.

use crate::db::DbError;
use crate::model::task::{Task, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error shared by all task backends.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while reading or writing a snapshot.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Snapshot file exists but is not valid task JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Db(DbError),
    /// A task about to be written violates model invariants.
    Validation(TaskValidationError),
    /// Persisted row could not be decoded into a task.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "i/o error on `{}`", path.display()),
            Self::Json { path, .. } => write!(f, "invalid task file `{}`", path.display()),
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            // Display already forwards these, so expose their cause instead.
            Self::Db(err) => err.source(),
            Self::Validation(err) => err.source(),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Snapshot persistence for the task list.
pub trait TaskStore {
    /// Loads every persisted task in stored order.
    fn load_tasks(&self) -> StoreResult<Vec<Task>>;
    /// Replaces the persisted snapshot with `tasks`.
    fn save_tasks(&mut self, tasks: &[Task]) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for Box<S> {
    fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        (**self).load_tasks()
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        (**self).save_tasks(tasks)
    }
}
