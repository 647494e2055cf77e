//! JSON file task store.
//!
//! # Responsibility
//! - Persist the task list as one pretty-printed JSON array.
//! - Treat a missing or blank snapshot file as an empty list.
//!
//! # Invariants
//! - Malformed JSON is an error, never an empty list.
//! - Writes land in a sibling temp file first and are renamed into place, so
//!   a failed save leaves the previous snapshot intact.

use super::{StoreError, StoreResult, TaskStore};
use crate::model::task::Task;
use log::{error, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_TASK_FILE: &str = "data/task.json";

/// Task store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "task.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_snapshot(&self, tasks: &[Task]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let mut body = serde_json::to_vec_pretty(tasks).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        body.push(b'\n');

        let temp_path = self.temp_path();
        let file = fs::File::create(&temp_path).map_err(|err| self.io_error(err))?;
        write_then_rename(file, &temp_path, &self.path, &body).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(err)
        })
    }
}

fn write_then_rename(
    mut file: fs::File,
    temp_path: &Path,
    target: &Path,
    body: &[u8],
) -> std::io::Result<()> {
    file.write_all(body)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, target)
}

impl Default for JsonTaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_FILE)
    }
}

impl TaskStore for JsonTaskStore {
    fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=tasks_load module=store status=ok backend=json count=0 file=missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            info!("event=tasks_load module=store status=ok backend=json count=0 file=blank");
            return Ok(Vec::new());
        }

        let tasks = serde_json::from_str::<Option<Vec<Task>>>(&raw)
            .map_err(|source| {
                error!(
                    "event=tasks_load module=store status=error backend=json error_code=json_decode_failed line={} column={}",
                    source.line(),
                    source.column()
                );
                StoreError::Json {
                    path: self.path.clone(),
                    source,
                }
            })?
            .unwrap_or_default();

        info!(
            "event=tasks_load module=store status=ok backend=json count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let started_at = Instant::now();
        match self.write_snapshot(tasks) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=store status=ok backend=json count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error backend=json error_code=write_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }
}
