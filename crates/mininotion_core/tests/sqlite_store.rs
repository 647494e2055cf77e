use chrono::NaiveDate;
use mininotion_core::{Priority, SqliteTaskStore, Status, StoreError, Subtask, Task, TaskStore};

#[test]
fn empty_database_loads_no_tasks() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    assert!(store.load_tasks().unwrap().is_empty());
}

#[test]
fn save_and_load_preserves_order_and_subtasks() {
    let mut store = SqliteTaskStore::open_in_memory().unwrap();

    let mut first = Task::new(
        "Finish report",
        "quarterly",
        Priority::High,
        NaiveDate::from_ymd_opt(2026, 10, 20),
    );
    first.status = Status::InProgress;
    first.add_subtask(Subtask::new("outline"));
    first.add_subtask(Subtask::new("draft"));
    first.subtasks[1].completed = true;
    let second = Task::new("Water plants", "", Priority::Low, None);
    let third = Task::new("Call mom", "", Priority::Medium, None);

    store
        .save_tasks(&[third.clone(), first.clone(), second.clone()])
        .unwrap();

    let loaded = store.load_tasks().unwrap();
    assert_eq!(loaded, vec![third, first, second]);
}

#[test]
fn save_replaces_previous_snapshot() {
    let mut store = SqliteTaskStore::open_in_memory().unwrap();

    let mut doomed = Task::new("old", "", Priority::Low, None);
    doomed.add_subtask(Subtask::new("old subtask"));
    store.save_tasks(&[doomed]).unwrap();

    let kept = Task::new("new", "", Priority::High, None);
    store.save_tasks(&[kept.clone()]).unwrap();

    assert_eq!(store.load_tasks().unwrap(), vec![kept]);
    let orphan_subtasks: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM subtasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphan_subtasks, 0);
}

#[test]
fn invalid_persisted_enum_is_reported() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    store
        .connection()
        .execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO tasks (uuid, position, title, description, priority, status, due_date)
             VALUES ('6f1c3a52-8f0e-4d8e-9a55-0c2b1f4e7d10', 0, 't', '', 'urgent', 'to_do', NULL);",
        )
        .unwrap();

    let err = store.load_tasks().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("urgent")));
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("tasks.db");

    let task = Task::new("persisted", "body", Priority::Medium, None);
    {
        let mut store = SqliteTaskStore::open(&path).unwrap();
        store.save_tasks(&[task.clone()]).unwrap();
    }

    let reopened = SqliteTaskStore::open(&path).unwrap();
    assert_eq!(reopened.load_tasks().unwrap(), vec![task]);
}
