/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD, statistics and recent activity

pub mod health;
pub mod tasks;
