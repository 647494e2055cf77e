//! Core domain logic for MiniNotion.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{AppConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date_expr::parse_date_expr;
pub use model::task::{Priority, Status, Subtask, Task, TaskId, TaskValidationError};
pub use repo::json_store::JsonTaskStore;
pub use repo::sqlite_store::SqliteTaskStore;
pub use repo::{StoreError, StoreResult, TaskStore};
pub use service::task_service::{
    ServiceResult, TaskDraft, TaskPatch, TaskService, TaskServiceError,
};
pub use view::{SortKey, TaskFilter};
