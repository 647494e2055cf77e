//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its subtask checklist.
//! - Derive progress and overdue projections from task state.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - Task identity is the `id` alone; other fields are mutable state.
//! - `title` must not be blank for a persisted task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Task urgency.
///
/// Variant order is significant: `High < Medium < Low`, so an ascending sort
/// puts the most urgent tasks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Created but not started.
    ToDo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl Status {
    /// Human-readable label used by list and detail views.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ToDo => "To-Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ToDo
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One checklist item under a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    /// Creates an uncompleted subtask.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Validation errors for task invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized with camelCase keys (`dueDate`) so snapshots stay readable by
/// other tools sharing the same `task.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    /// Calendar due date, serialized as `YYYY-MM-DD` and omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Creates a new task with a generated stable ID.
    ///
    /// # Invariants
    /// - Status starts as `Status::ToDo`.
    /// - Subtask list starts empty.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, priority, due_date)
    }

    /// Creates a task with a caller-provided ID.
    ///
    /// Used by storage decode paths where identity already exists.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
            status: Status::ToDo,
            due_date,
            subtasks: Vec::new(),
        }
    }

    /// Appends a subtask, keeping insertion order.
    pub fn add_subtask(&mut self, subtask: Subtask) {
        self.subtasks.push(subtask);
    }

    /// Number of completed subtasks.
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Progress in `[0.0, 1.0]`.
    ///
    /// Without subtasks the status decides: `Done` is complete, anything else
    /// is not started.
    pub fn completion_ratio(&self) -> f64 {
        if self.subtasks.is_empty() {
            return if self.status == Status::Done { 1.0 } else { 0.0 };
        }
        self.completed_subtasks() as f64 / self.subtasks.len() as f64
    }

    /// Whether the task is past due relative to `today`.
    ///
    /// A task due today is not overdue; finished tasks never are.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != Status::Done,
            None => false,
        }
    }

    /// Checks task invariants before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Status, Subtask, Task, TaskValidationError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn new_task_starts_todo_without_subtasks() {
        let task = Task::new("write report", "", Priority::High, None);
        assert_eq!(task.status, Status::ToDo);
        assert!(task.subtasks.is_empty());
        assert_ne!(task.id, Task::new("write report", "", Priority::High, None).id);
    }

    #[test]
    fn completion_without_subtasks_follows_status() {
        let mut task = Task::new("t", "", Priority::Low, None);
        assert_eq!(task.completion_ratio(), 0.0);
        task.status = Status::InProgress;
        assert_eq!(task.completion_ratio(), 0.0);
        task.status = Status::Done;
        assert_eq!(task.completion_ratio(), 1.0);
    }

    #[test]
    fn completion_counts_checked_subtasks() {
        let mut task = Task::new("t", "", Priority::Low, None);
        task.status = Status::Done;
        task.add_subtask(Subtask::new("a"));
        task.add_subtask(Subtask::new("b"));
        task.add_subtask(Subtask::new("c"));
        task.add_subtask(Subtask::new("d"));
        task.subtasks[1].completed = true;
        assert_eq!(task.completed_subtasks(), 1);
        assert_eq!(task.completion_ratio(), 0.25);
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let today = date(2026, 10, 19);
        let mut task = Task::new("t", "", Priority::Medium, Some(date(2026, 10, 18)));
        assert!(task.is_overdue(today));

        task.due_date = Some(today);
        assert!(!task.is_overdue(today));

        task.due_date = Some(date(2026, 1, 1));
        task.status = Status::Done;
        assert!(!task.is_overdue(today));

        task.due_date = None;
        task.status = Status::ToDo;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn priority_orders_high_first() {
        let mut priorities = vec![Priority::Low, Priority::High, Priority::Medium];
        priorities.sort();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn status_display_names_are_human_readable() {
        assert_eq!(Status::ToDo.to_string(), "To-Do");
        assert_eq!(Status::InProgress.to_string(), "In Progress");
        assert_eq!(Status::Done.to_string(), "Done");
    }

    #[test]
    fn validate_rejects_blank_title() {
        let task = Task::new("   ", "", Priority::Medium, None);
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTitle));
    }
}
