/// Common error type for task operations
///
/// All repository and service operations return `Result<T, TaskError>`.
/// Store failures propagate unchanged from sqlx; the API layer decides how
/// each variant maps to an HTTP status.

use thiserror::Error;

/// Errors surfaced by the task repository and lifecycle service
#[derive(Debug, Error)]
pub enum TaskError {
    /// The requested task id does not resolve to a row
    #[error("Task {0} not found")]
    NotFound(i32),

    /// A required argument was missing or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// Underlying persistence failure (connectivity, constraint violation)
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl TaskError {
    /// True when the error denotes a missing row rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::NotFound(42);
        assert_eq!(err.to_string(), "Task 42 not found");

        let err = TaskError::InvalidArgument("Invalid user or category".to_string());
        assert_eq!(err.to_string(), "Invalid user or category");
    }

    #[test]
    fn test_is_not_found() {
        assert!(TaskError::NotFound(1).is_not_found());
        assert!(!TaskError::InvalidArgument("x".into()).is_not_found());
    }
}
