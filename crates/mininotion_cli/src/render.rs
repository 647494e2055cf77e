//! Plain-text rendering of task rows and the details panel.

use chrono::NaiveDate;
use mininotion_core::{Priority, Task};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;
const SHORT_ID_LEN: usize = 8;

/// First characters of the task id, enough to address it from the CLI.
pub fn short_id(task: &Task) -> String {
    task.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!!",
        Priority::Medium => "!! ",
        Priority::Low => "!  ",
    }
}

/// `[#####---------------]  25%`
pub fn progress_bar(ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (ratio * 100.0).round() as u32
    )
}

/// One list entry: id, priority, title, status/due line and progress.
pub fn list_row(task: &Task, today: NaiveDate) -> String {
    let due = task
        .due_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "No due date".to_string());
    let overdue = if task.is_overdue(today) { "  OVERDUE" } else { "" };

    format!(
        "{}  {} {}{}\n          Status: {} | Due: {}\n          {}",
        short_id(task),
        priority_marker(task.priority),
        task.title,
        overdue,
        task.status,
        due,
        progress_bar(task.completion_ratio())
    )
}

/// Full list, or a placeholder when nothing is visible.
pub fn task_list(tasks: &[&Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }
    tasks
        .iter()
        .map(|task| list_row(task, today))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Details panel for one task. Subtasks are numbered from 1.
pub fn details(task: &Task) -> String {
    let mut out = String::new();
    let due = task
        .due_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let _ = writeln!(out, "{}", task.title);
    let _ = writeln!(out, "Id: {}", task.id);
    let _ = writeln!(out, "Status: {}", task.status);
    let _ = writeln!(out, "Priority: {}", task.priority);
    let _ = writeln!(out, "Due: {due}");
    let _ = writeln!(out, "{}", "-".repeat(40));
    if task.description.trim().is_empty() {
        let _ = writeln!(out, "(no description)");
    } else {
        let _ = writeln!(out, "{}", task.description);
    }
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(
        out,
        "Subtasks {}/{}",
        task.completed_subtasks(),
        task.subtasks.len()
    );
    let _ = writeln!(out, "{}", progress_bar(task.completion_ratio()));
    for (index, subtask) in task.subtasks.iter().enumerate() {
        let mark = if subtask.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "  {:>2}. [{mark}] {}", index + 1, subtask.text);
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::{details, list_row, progress_bar, short_id, task_list};
    use chrono::NaiveDate;
    use mininotion_core::{Priority, Status, Subtask, Task};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn progress_bar_scales_and_clamps() {
        assert_eq!(progress_bar(0.0), format!("[{}]   0%", "-".repeat(20)));
        assert_eq!(progress_bar(1.0), format!("[{}] 100%", "#".repeat(20)));
        assert!(progress_bar(0.25).starts_with("[#####-"));
        assert!(progress_bar(0.25).ends_with(" 25%"));
        assert_eq!(progress_bar(7.0), progress_bar(1.0));
    }

    #[test]
    fn list_row_marks_overdue_open_tasks() {
        let today = date(2026, 10, 19);
        let task = Task::new("Pay rent", "", Priority::High, Some(date(2026, 10, 1)));
        let row = list_row(&task, today);
        assert!(row.starts_with(&short_id(&task)));
        assert!(row.contains("!!! Pay rent  OVERDUE"));
        assert!(row.contains("Status: To-Do | Due: 2026-10-01"));

        let mut done = task.clone();
        done.status = Status::Done;
        assert!(!list_row(&done, today).contains("OVERDUE"));
    }

    #[test]
    fn list_row_shows_missing_due_date() {
        let task = Task::new("Someday", "", Priority::Low, None);
        assert!(list_row(&task, date(2026, 1, 1)).contains("Due: No due date"));
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(task_list(&[], date(2026, 1, 1)), "No tasks.");
    }

    #[test]
    fn details_numbers_subtasks_from_one() {
        let mut task = Task::new("Trip", "pack light", Priority::Medium, None);
        task.add_subtask(Subtask::new("flights"));
        task.add_subtask(Subtask::new("hotel"));
        task.subtasks[1].completed = true;

        let panel = details(&task);
        assert!(panel.contains("Status: To-Do"));
        assert!(panel.contains("Priority: MEDIUM"));
        assert!(panel.contains("Due: N/A"));
        assert!(panel.contains("pack light"));
        assert!(panel.contains("Subtasks 1/2"));
        assert!(panel.contains("   1. [ ] flights"));
        assert!(panel.contains("   2. [x] hotel"));
    }
}
