//! Task use-case service.
//!
//! # Responsibility
//! - Own the in-memory task list loaded from a `TaskStore`.
//! - Provide create/edit/delete and subtask checklist use-cases.
//! - Resolve user-typed id prefixes to stable task ids.
//!
//! # Invariants
//! - A load failure is surfaced, never replaced by an empty list, so a later
//!   save cannot overwrite unreadable user data.
//! - Titles and subtask texts are trimmed and must not be blank.
//! - Log events carry ids and counts only, never task text.

use crate::model::task::{Priority, Status, Subtask, Task, TaskId, TaskValidationError};
use crate::repo::{StoreError, TaskStore};
use crate::view::{self, SortKey, TaskFilter};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Title is blank after trimming.
    EmptyTitle,
    /// Subtask text is blank after trimming.
    EmptySubtask,
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// No task id starts with the given prefix.
    UnknownId(String),
    /// More than one task id starts with the given prefix.
    AmbiguousId { prefix: String, matches: usize },
    /// Subtask index is out of range for the task.
    SubtaskNotFound { task_id: TaskId, index: usize },
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptySubtask => write!(f, "subtask text cannot be empty"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::UnknownId(prefix) => write!(f, "no task matches id `{prefix}`"),
            Self::AmbiguousId { prefix, matches } => {
                write!(f, "id `{prefix}` is ambiguous ({matches} tasks match)")
            }
            Self::SubtaskNotFound { task_id, index } => {
                write!(f, "task {task_id} has no subtask at index {index}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => err.source(),
            _ => None,
        }
    }
}

impl From<StoreError> for TaskServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyTitle => Self::EmptyTitle,
        }
    }
}

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Input for creating a task, pre-filled with the add-task defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Draft with priority `Medium`, status `ToDo` and due date `today`.
    pub fn new(title: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::ToDo,
            due_date: Some(today),
        }
    }
}

/// Partial edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Task service facade over a snapshot store.
pub struct TaskService<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    dirty: bool,
}

impl<S: TaskStore> TaskService<S> {
    /// Loads the current snapshot from `store`.
    pub fn open(store: S) -> ServiceResult<Self> {
        let tasks = store.load_tasks()?;
        Ok(Self {
            store,
            tasks,
            dirty: false,
        })
    }

    /// All tasks in list order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether in-memory state differs from the last load/save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Filtered and sorted projection of the list.
    pub fn view(&self, filter: &TaskFilter, sort: SortKey) -> Vec<&Task> {
        view::apply(&self.tasks, filter, sort)
    }

    /// Resolves a full id or unique case-insensitive id prefix.
    pub fn resolve_id(&self, prefix: &str) -> ServiceResult<TaskId> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(TaskServiceError::UnknownId(prefix.to_string()));
        }

        let matches = self
            .tasks
            .iter()
            .filter(|task| task.id.to_string().starts_with(&needle))
            .map(|task| task.id)
            .collect::<Vec<_>>();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(TaskServiceError::UnknownId(prefix.to_string())),
            _ => Err(TaskServiceError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Creates a task from a draft and appends it to the list.
    pub fn create_task(&mut self, draft: TaskDraft) -> ServiceResult<&Task> {
        let title = normalize_title(&draft.title)?;
        let mut task = Task::new(title, draft.description, draft.priority, draft.due_date);
        task.status = draft.status;
        let task_id = task.id;
        self.tasks.push(task);
        self.dirty = true;

        info!(
            "event=task_create module=service status=ok task_id={} total={}",
            task_id,
            self.tasks.len()
        );
        self.find(task_id)
    }

    /// Applies a partial edit to an existing task.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> ServiceResult<&Task> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let task = self.find_mut(id)?;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        self.dirty = true;

        info!("event=task_update module=service status=ok task_id={id}");
        self.find(id)
    }

    /// Removes a task permanently and returns it.
    pub fn delete_task(&mut self, id: TaskId) -> ServiceResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        let removed = self.tasks.remove(index);
        self.dirty = true;

        info!(
            "event=task_delete module=service status=ok task_id={} total={}",
            id,
            self.tasks.len()
        );
        Ok(removed)
    }

    /// Appends a new unchecked subtask.
    pub fn add_subtask(&mut self, id: TaskId, text: &str) -> ServiceResult<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskServiceError::EmptySubtask);
        }

        let task = self.find_mut(id)?;
        task.add_subtask(Subtask::new(text));
        let count = task.subtasks.len();
        self.dirty = true;

        info!("event=subtask_add module=service status=ok task_id={id} subtasks={count}");
        self.find(id)
    }

    /// Checks or unchecks the subtask at zero-based `index`.
    pub fn set_subtask_completed(
        &mut self,
        id: TaskId,
        index: usize,
        completed: bool,
    ) -> ServiceResult<&Task> {
        let task = self.find_mut(id)?;
        let subtask = task
            .subtasks
            .get_mut(index)
            .ok_or(TaskServiceError::SubtaskNotFound { task_id: id, index })?;
        subtask.completed = completed;
        self.dirty = true;

        info!(
            "event=subtask_toggle module=service status=ok task_id={id} index={index} completed={completed}"
        );
        self.find(id)
    }

    /// Writes the current list through the store.
    pub fn save(&mut self) -> ServiceResult<()> {
        if let Err(err) = self.store.save_tasks(&self.tasks) {
            warn!("event=tasks_save module=service status=error error={err}");
            return Err(err.into());
        }
        self.dirty = false;
        Ok(())
    }

    /// Consumes the service and returns the store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn find(&self, id: TaskId) -> ServiceResult<&Task> {
        self.get(id).ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn find_mut(&mut self, id: TaskId) -> ServiceResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskServiceError::TaskNotFound(id))
    }
}

fn normalize_title(raw: &str) -> ServiceResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TaskServiceError::EmptyTitle);
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_title;

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  report ").expect("valid title"), "report");
        assert!(normalize_title(" \t ").is_err());
    }
}
