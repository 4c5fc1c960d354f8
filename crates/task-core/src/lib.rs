//! In-memory task management.
//!
//! [`TaskService`] owns a [`TaskStorage`] and is the usual entry point. The
//! [`query`] functions work on any sequence of tasks and can be used on
//! their own.

pub mod error;
pub mod models;
pub mod query;
pub mod record;
pub mod service;
pub mod storage;
pub mod validators;

pub use error::{TaskError, TaskResult};
pub use models::{today, Priority, Recurrence, Status, Task, TaskBuilder, TaskId, TaskStats};
pub use record::{FieldValue, TaskRecord};
pub use service::{CompletionStats, TaskDraft, TaskService};
pub use storage::{TaskPatch, TaskStorage};
