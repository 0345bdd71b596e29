/// Task repository
///
/// The repository translates lifecycle operations into persistence calls
/// and owns no business rules. It is expressed as a trait so the service
/// can be exercised against a test double; the production implementation
/// (`PgTaskRepository`) wraps an injected `PgPool`.
///
/// "Not found" is expressed structurally here (`Option` / `bool`); only
/// genuine store faults surface as errors.

use async_trait::async_trait;

use crate::error::TaskError;
use crate::models::task::{
    NewTask, RecentTaskRow, Task, TaskCountFilter, TaskPatch, TaskWithCategory,
};

pub mod postgres;

pub use postgres::PgTaskRepository;

/// Persistence operations over task records
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks, each joined with its category
    async fn find_all(&self) -> Result<Vec<TaskWithCategory>, TaskError>;

    /// All tasks owned by `user_id`, joined with category
    async fn find_all_by_user(&self, user_id: i32) -> Result<Vec<TaskWithCategory>, TaskError>;

    /// Single task by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, TaskError>;

    /// Inserts a new row, returning the created record with generated id
    /// and timestamps
    async fn create(&self, task: NewTask) -> Result<Task, TaskError>;

    /// Applies a partial field set and bumps `updated_at`, returning the new
    /// snapshot, or None when the id does not resolve
    async fn update(&self, id: i32, patch: TaskPatch) -> Result<Option<Task>, TaskError>;

    /// Removes a row; false when the id did not resolve
    async fn delete(&self, id: i32) -> Result<bool, TaskError>;

    /// Count of tasks matching the filter; backs every aggregate query
    async fn count(&self, filter: TaskCountFilter) -> Result<i64, TaskError>;

    /// The `limit` most recently updated tasks for a user, ordered by
    /// `updated_at` descending, joined with category name and owner username
    async fn recent_by_user(
        &self,
        user_id: i32,
        limit: i64,
    ) -> Result<Vec<RecentTaskRow>, TaskError>;
}
