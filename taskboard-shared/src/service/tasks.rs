/// Task lifecycle service
///
/// All task business operations and statistics, given a repository
/// dependency. The service owns the field contract (a task must be created
/// with an owner and a category), the status taxonomy, and the deadline
/// arithmetic behind the aggregate counts:
///
/// - overdue: `deadline < today` and not completed (strict)
/// - priority: `deadline <= today + 3 days` and not completed (inclusive)
///
/// The asymmetry between the two windows is part of the contract. "Today"
/// is the server's local calendar date at call time.
///
/// Requests are handled strictly sequentially per call; concurrent updates
/// to the same task are last-write-wins. The category update re-reads the
/// row after persisting and returns the committed state.

use chrono::{Duration, Local, NaiveDate};
use chrono_tz::Asia::Shanghai;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::TaskError;
use crate::models::task::{
    NewTask, RecentTaskRow, Task, TaskCountFilter, TaskPatch, TaskStatus, TaskWithCategory,
};
use crate::repo::TaskRepository;

/// Deadline look-ahead window for priority tasks, in calendar days
const PRIORITY_WINDOW_DAYS: i64 = 3;

/// Number of entries in the recent-activity feed
const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Timestamp format of the activity feed
const ACTIVITY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fields accepted when creating a task
///
/// `user_id` and `category_id` are optional here so the service can apply
/// the legacy validation rule itself: absent or zero ids are rejected as
/// invalid, everything else is trusted (the auth collaborator has already
/// verified the user, and category existence is left to the store's
/// foreign-key constraint).
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub user_id: Option<i32>,
    pub category_id: Option<i32>,
    pub deadline: Option<NaiveDate>,
}

/// Fields replaced by a full task update
#[derive(Debug, Clone)]
pub struct UpdateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub deadline: Option<NaiveDate>,
}

/// One entry of the recent-activity feed
///
/// A snapshot derived from current field values, not an audit log: it
/// cannot distinguish a title edit from a status change, and since every
/// task carries a status, `statusChanged` is present on every entry in
/// practice. The timestamp is rendered in a fixed zone regardless of the
/// caller's or server's locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub title: String,

    pub updated_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_changed: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_changed: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_changed: Option<String>,
}

impl ActivityEntry {
    fn from_row(row: RecentTaskRow) -> Self {
        Self {
            title: row.title,
            updated_at: row
                .updated_at
                .with_timezone(&Shanghai)
                .format(ACTIVITY_TIME_FORMAT)
                .to_string(),
            status_changed: Some(row.status),
            category_changed: row.category_name.filter(|name| !name.is_empty()),
            user_changed: row.username.filter(|name| !name.is_empty()),
        }
    }
}

/// Task lifecycle service over an injected repository
#[derive(Debug, Clone)]
pub struct TaskService<R> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task, defaulting the status to pending
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the owner or category id is absent or zero.
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, TaskError> {
        let user_id = input.user_id.filter(|id| *id != 0);
        let category_id = input.category_id.filter(|id| *id != 0);

        let (Some(user_id), Some(category_id)) = (user_id, category_id) else {
            return Err(TaskError::InvalidArgument(
                "Invalid user or category".to_string(),
            ));
        };

        let task = self
            .repo
            .create(NewTask {
                title: input.title,
                description: input.description,
                status: input.status.unwrap_or_default(),
                user_id,
                category_id: Some(category_id),
                deadline: input.deadline,
            })
            .await?;

        info!(task_id = task.id, user_id, "Task created");
        Ok(task)
    }

    /// Replaces every editable field of the task found by id
    pub async fn update_task(&self, id: i32, input: UpdateTaskInput) -> Result<Task, TaskError> {
        let patch = TaskPatch {
            title: Some(input.title),
            description: Some(input.description),
            status: Some(input.status),
            user_id: Some(input.user_id),
            category_id: Some(input.category_id),
            deadline: Some(input.deadline),
        };

        let task = self
            .repo
            .update(id, patch)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        info!(task_id = id, "Task updated");
        Ok(task)
    }

    /// Deletes a task unconditionally
    pub async fn delete_task(&self, id: i32) -> Result<(), TaskError> {
        if !self.repo.delete(id).await? {
            return Err(TaskError::NotFound(id));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Sets the status field only, leaving all else unchanged
    ///
    /// Any status may move to any other; no state is terminal.
    pub async fn update_task_status(&self, id: i32, status: TaskStatus) -> Result<Task, TaskError> {
        let task = self
            .repo
            .update(id, TaskPatch::status_only(status))
            .await?
            .ok_or(TaskError::NotFound(id))?;

        info!(task_id = id, status = %status, "Task status updated");
        Ok(task)
    }

    /// Sets the category field only, then re-reads the committed row
    ///
    /// The re-read guarantees the caller observes the state the store
    /// actually persisted, not an in-process snapshot that may have
    /// diverged.
    pub async fn update_task_category(&self, id: i32, category_id: i32) -> Result<Task, TaskError> {
        debug!(task_id = id, category_id, "Updating task category");

        self.repo
            .update(id, TaskPatch::category_only(category_id))
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let refreshed = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        info!(task_id = id, category_id, "Task category updated");
        Ok(refreshed)
    }

    /// All tasks, joined with category
    pub async fn get_all_tasks(&self) -> Result<Vec<TaskWithCategory>, TaskError> {
        self.repo.find_all().await.map_err(|err| {
            error!(error = %err, "Error fetching tasks");
            err
        })
    }

    /// All tasks owned by a user, joined with category
    pub async fn get_all_tasks_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<TaskWithCategory>, TaskError> {
        self.repo.find_all_by_user(user_id).await.map_err(|err| {
            error!(error = %err, user_id, "Error fetching tasks for user");
            err
        })
    }

    /// Count of all tasks owned by a user
    pub async fn total_tasks_count(&self, user_id: i32) -> Result<i64, TaskError> {
        self.repo.count(TaskCountFilter::for_user(user_id)).await
    }

    /// Count of completed tasks owned by a user
    pub async fn completed_tasks_count(&self, user_id: i32) -> Result<i64, TaskError> {
        let filter = TaskCountFilter {
            status: Some(TaskStatus::Completed),
            ..TaskCountFilter::for_user(user_id)
        };
        self.repo.count(filter).await
    }

    /// Count of tasks whose deadline has passed and are not completed
    pub async fn overdue_tasks_count(&self, user_id: i32) -> Result<i64, TaskError> {
        let filter = TaskCountFilter {
            status_not: Some(TaskStatus::Completed),
            deadline_before: Some(today()),
            ..TaskCountFilter::for_user(user_id)
        };
        self.repo.count(filter).await
    }

    /// Count of not-completed tasks due within the 3-day look-ahead window
    ///
    /// Inclusive bound, unlike the strict comparison for overdue.
    pub async fn priority_tasks_count(&self, user_id: i32) -> Result<i64, TaskError> {
        let upcoming = today() + Duration::days(PRIORITY_WINDOW_DAYS);

        let filter = TaskCountFilter {
            status_not: Some(TaskStatus::Completed),
            deadline_on_or_before: Some(upcoming),
            ..TaskCountFilter::for_user(user_id)
        };
        self.repo.count(filter).await
    }

    /// The 5 most recently updated tasks for a user, as a change feed
    pub async fn recent_activity(&self, user_id: i32) -> Result<Vec<ActivityEntry>, TaskError> {
        let rows = self
            .repo
            .recent_by_user(user_id, RECENT_ACTIVITY_LIMIT)
            .await?;

        Ok(rows.into_iter().map(ActivityEntry::from_row).collect())
    }
}

/// The server's local calendar date, evaluated at call time
fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(
        title: &str,
        status: TaskStatus,
        category: Option<&str>,
        username: Option<&str>,
    ) -> RecentTaskRow {
        RecentTaskRow {
            title: title.to_string(),
            status,
            updated_at: Utc.with_ymd_and_hms(2025, 3, 1, 16, 30, 0).unwrap(),
            category_name: category.map(str::to_string),
            username: username.map(str::to_string),
        }
    }

    #[test]
    fn test_activity_entry_formats_timestamp_in_fixed_zone() {
        // 16:30 UTC is 00:30 next day in Asia/Shanghai (UTC+8)
        let entry = ActivityEntry::from_row(row("t", TaskStatus::Pending, None, None));
        assert_eq!(entry.updated_at, "2025-03-02 00:30:00");
    }

    #[test]
    fn test_activity_entry_conditional_fields() {
        let entry = ActivityEntry::from_row(row(
            "t",
            TaskStatus::Completed,
            Some("Work"),
            Some("alice"),
        ));
        assert_eq!(entry.status_changed, Some(TaskStatus::Completed));
        assert_eq!(entry.category_changed.as_deref(), Some("Work"));
        assert_eq!(entry.user_changed.as_deref(), Some("alice"));

        // empty names are treated as absent
        let entry = ActivityEntry::from_row(row("t", TaskStatus::Pending, Some(""), Some("")));
        assert!(entry.category_changed.is_none());
        assert!(entry.user_changed.is_none());
    }

    #[test]
    fn test_activity_entry_serialization_omits_absent_fields() {
        let entry = ActivityEntry::from_row(row("t", TaskStatus::Pending, None, Some("bob")));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["statusChanged"], "pending");
        assert_eq!(json["userChanged"], "bob");
        assert!(json.get("categoryChanged").is_none());
        assert!(json.get("updatedAt").is_some());
    }
}
