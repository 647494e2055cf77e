//! Filtered and sorted projections of the task list.
//!
//! # Responsibility
//! - Combine title search and status filter into one predicate.
//! - Order visible tasks by due date or priority.
//!
//! # Invariants
//! - Projections borrow tasks; they never reorder the underlying list.
//! - Sorting is stable, so ties keep list order.
//! - Tasks without a due date sort after all dated tasks.

use crate::model::task::{Status, Task};
use std::cmp::Ordering;
use std::str::FromStr;

/// Visible-row predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive title substring, matched as typed. Blank matches
    /// everything.
    pub search: Option<String>,
    /// Exact status match. `None` matches everything.
    pub status: Option<Status>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task) && self.matches_status(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        match self.search.as_deref() {
            None => true,
            Some(needle) if needle.trim().is_empty() => true,
            Some(needle) => task
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    fn matches_status(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
    }
}

/// Sort order for the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest due date first; undated tasks last.
    #[default]
    DueDate,
    /// High, then Medium, then Low.
    Priority,
}

impl SortKey {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => match (a.due_date, b.due_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Priority => a.priority.cmp(&b.priority),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "due" | "due-date" | "due_date" | "date" => Ok(Self::DueDate),
            "priority" | "prio" => Ok(Self::Priority),
            other => Err(format!("unsupported sort key `{other}`; expected due|priority")),
        }
    }
}

/// Applies `filter` then a stable sort by `sort`.
pub fn apply<'a>(tasks: &'a [Task], filter: &TaskFilter, sort: SortKey) -> Vec<&'a Task> {
    let mut visible = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .collect::<Vec<_>>();
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}
