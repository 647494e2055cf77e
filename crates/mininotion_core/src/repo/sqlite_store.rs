//! SQLite task store.
//!
//! # Responsibility
//! - Persist task snapshots into the `tasks`/`subtasks` tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_tasks` replaces all rows in a single transaction.
//! - List order is preserved through the `position` columns.
//! - Rows with unknown enum text, bad uuids or bad dates fail the load.

use super::{StoreError, StoreResult, TaskStore};
use crate::db::{open_db, open_db_in_memory};
use crate::model::task::{Priority, Status, Subtask, Task};
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    priority,
    status,
    due_date
FROM tasks
ORDER BY position ASC, uuid ASC";

const SUBTASK_SELECT_SQL: &str = "SELECT
    text,
    completed
FROM subtasks
WHERE task_uuid = ?1
ORDER BY position ASC";

/// SQLite-backed task store.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Wraps a connection that has already been opened through `crate::db`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) the database file at `path`.
    ///
    /// Parent directories are created when missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn replace_snapshot(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM subtasks;", [])?;
        tx.execute("DELETE FROM tasks;", [])?;
        {
            let mut insert_task = tx.prepare(
                "INSERT INTO tasks (
                    uuid,
                    position,
                    title,
                    description,
                    priority,
                    status,
                    due_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            let mut insert_subtask = tx.prepare(
                "INSERT INTO subtasks (task_uuid, position, text, completed)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;

            for (position, task) in tasks.iter().enumerate() {
                let uuid = task.id.to_string();
                insert_task.execute(params![
                    uuid,
                    position as i64,
                    task.title.as_str(),
                    task.description.as_str(),
                    priority_to_db(task.priority),
                    status_to_db(task.status),
                    task.due_date.map(|date| date.to_string()),
                ])?;

                for (sub_position, subtask) in task.subtasks.iter().enumerate() {
                    insert_subtask.execute(params![
                        uuid,
                        sub_position as i64,
                        subtask.text.as_str(),
                        bool_to_int(subtask.completed),
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_subtasks(&self, task_uuid: &str) -> StoreResult<Vec<Subtask>> {
        let mut stmt = self.conn.prepare_cached(SUBTASK_SELECT_SQL)?;
        let mut rows = stmt.query([task_uuid])?;
        let mut subtasks = Vec::new();

        while let Some(row) = rows.next()? {
            let completed = match row.get::<_, i64>("completed")? {
                0 => false,
                1 => true,
                other => {
                    return Err(StoreError::InvalidData(format!(
                        "invalid completed value `{other}` in subtasks.completed"
                    )));
                }
            };
            subtasks.push(Subtask {
                text: row.get("text")?,
                completed,
            });
        }

        Ok(subtasks)
    }
}

impl TaskStore for SqliteTaskStore {
    fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(TASK_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        drop(rows);

        for task in &mut tasks {
            task.subtasks = self.load_subtasks(&task.id.to_string())?;
        }

        info!(
            "event=tasks_load module=store status=ok backend=sqlite count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        for task in tasks {
            task.validate()?;
        }

        match self.replace_snapshot(tasks) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=store status=ok backend=sqlite count={}",
                    tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error backend=sqlite error_code=tx_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            StoreError::InvalidData(format!("invalid due date `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    let mut task = Task::with_id(
        id,
        row.get::<_, String>("title")?,
        row.get::<_, String>("description")?,
        priority,
        due_date,
    );
    task.status = status;
    Ok(task)
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "high" => Some(Priority::High),
        "medium" => Some(Priority::Medium),
        "low" => Some(Priority::Low),
        _ => None,
    }
}

fn status_to_db(status: Status) -> &'static str {
    match status {
        Status::ToDo => "to_do",
        Status::InProgress => "in_progress",
        Status::Done => "done",
    }
}

fn parse_status(value: &str) -> Option<Status> {
    match value {
        "to_do" => Some(Status::ToDo),
        "in_progress" => Some(Status::InProgress),
        "done" => Some(Status::Done),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
