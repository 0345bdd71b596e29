/// Task model and associated data structures
///
/// Tasks are the central entity of Taskboard: a unit of work owned by a
/// user, with a status, an optional category and an optional deadline.
///
/// # Status
///
/// ```text
/// pending | in-progress | completed
/// ```
///
/// There is no enforced transition graph: any status may move to any other
/// via a status update or a full update, and no status is terminal (a
/// completed task can be re-opened).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
///
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
///     deadline DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `updated_at` is bumped on every mutation, including status-only and
/// category-only updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::category::Category;

/// Task status
///
/// The legacy wire and column values use a hyphen for `in-progress`, so the
/// variants carry explicit renames instead of a blanket rename rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task has not been started yet (default)
    #[serde(rename = "pending")]
    #[sqlx(rename = "pending")]
    Pending,

    /// Task is being worked on
    #[serde(rename = "in-progress")]
    #[sqlx(rename = "in-progress")]
    InProgress,

    /// Task is done
    #[serde(rename = "completed")]
    #[sqlx(rename = "completed")]
    Completed,
}

impl TaskStatus {
    /// Converts status to its wire/storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task row as persisted
///
/// Field names follow the legacy JSON contract: foreign keys stay
/// snake_case while the timestamps serialize camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id, system-assigned
    pub id: i32,

    /// Required title
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Owning user (required, never transferred)
    pub user_id: i32,

    /// Optional category reference
    pub category_id: Option<i32>,

    /// Optional calendar-date deadline (no time-of-day component)
    pub deadline: Option<NaiveDate>,

    /// When the task was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A task joined with its category for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithCategory {
    #[serde(flatten)]
    pub task: Task,

    /// Joined category, absent when `category_id` is NULL or dangling
    pub category: Option<Category>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub deadline: Option<NaiveDate>,
}

/// Partial field set for updating a task
///
/// Outer `None` leaves the column untouched; for nullable columns the inner
/// option is written as-is, so `Some(None)` clears the value. Every update
/// bumps `updated_at`, even when no other field is named.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub user_id: Option<i32>,
    pub category_id: Option<Option<i32>>,
    pub deadline: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Patch that changes the status and nothing else
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that changes the category and nothing else
    pub fn category_only(category_id: i32) -> Self {
        Self {
            category_id: Some(Some(category_id)),
            ..Self::default()
        }
    }
}

/// Filter for task count queries
///
/// One parameterized count backs every aggregate: total, completed, overdue
/// and priority are all expressed by filling in the optional bounds.
#[derive(Debug, Clone)]
pub struct TaskCountFilter {
    /// Owning user
    pub user_id: i32,

    /// Count only tasks with this status
    pub status: Option<TaskStatus>,

    /// Exclude tasks with this status
    pub status_not: Option<TaskStatus>,

    /// Count only tasks with `deadline < bound`
    pub deadline_before: Option<NaiveDate>,

    /// Count only tasks with `deadline <= bound`
    pub deadline_on_or_before: Option<NaiveDate>,
}

impl TaskCountFilter {
    /// Filter matching every task owned by `user_id`
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id,
            status: None,
            status_not: None,
            deadline_before: None,
            deadline_on_or_before: None,
        }
    }
}

/// A recently updated task joined with category name and owner username,
/// as consumed by the activity feed
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentTaskRow {
    pub title: String,
    pub status: TaskStatus,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_task_status_serde_uses_hyphenated_form() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);

        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_task_serialization_field_names() {
        let task = Task {
            id: 1,
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::Pending,
            user_id: 7,
            category_id: Some(2),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["category_id"], 2);
        assert_eq!(json["deadline"], "2025-06-01");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_task_with_category_flattens_task_fields() {
        let task = Task {
            id: 3,
            title: "Groceries".to_string(),
            description: Some("milk".to_string()),
            status: TaskStatus::InProgress,
            user_id: 1,
            category_id: Some(5),
            deadline: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let joined = TaskWithCategory {
            task,
            category: Some(Category {
                id: 5,
                name: "Home".to_string(),
            }),
        };

        let json = serde_json::to_value(&joined).unwrap();
        assert_eq!(json["title"], "Groceries");
        assert_eq!(json["category"]["name"], "Home");
    }

    #[test]
    fn test_task_patch_constructors() {
        let patch = TaskPatch::status_only(TaskStatus::Completed);
        assert_eq!(patch.status, Some(TaskStatus::Completed));
        assert!(patch.title.is_none());
        assert!(patch.category_id.is_none());

        let patch = TaskPatch::category_only(9);
        assert_eq!(patch.category_id, Some(Some(9)));
        assert!(patch.status.is_none());
    }
}
