//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Subtasks have no identity of their own; they are addressed by position.

pub mod date_expr;
pub mod task;
