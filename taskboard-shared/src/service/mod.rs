/// Task business logic
///
/// # Modules
///
/// - `tasks`: Task lifecycle operations, deadline-derived statistics and
///   the recent-activity feed

pub mod tasks;

pub use tasks::{ActivityEntry, CreateTaskInput, TaskService, UpdateTaskInput};
