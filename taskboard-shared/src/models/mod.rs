/// Database models for Taskboard
///
/// # Models
///
/// - `task`: Tasks with status, deadline and category/owner references
/// - `category`: Category labels tasks can be grouped under
/// - `user`: User accounts (owned by the auth collaborator; read-only here)
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{NewTask, TaskStatus};
///
/// let new_task = NewTask {
///     title: "Write report".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     user_id: 1,
///     category_id: Some(2),
///     deadline: None,
/// };
/// ```

pub mod category;
pub mod task;
pub mod user;
