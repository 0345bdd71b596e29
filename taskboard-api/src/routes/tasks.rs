/// Task endpoints
///
/// The full task surface: CRUD, status/category mutations, per-user
/// aggregate counts and the recent-activity feed. Paths and JSON shapes
/// follow the legacy contract consumed by the frontend, including the
/// wrapped `{message, task}` mutation responses and the per-aggregate
/// count keys.
///
/// Authentication is an external collaborator: every per-user operation
/// trusts the `userId` it is given and performs no re-authorization check.
///
/// # Endpoints
///
/// ```text
/// GET    /api/tasks                   all tasks with categories
/// POST   /api/tasks                   create task
/// PUT    /api/tasks/:id               full update
/// DELETE /api/tasks/:id               delete
/// PUT    /api/tasks/:id/status        status-only update
/// PUT    /api/tasks/:id/category      category-only update (re-read)
/// GET    /api/tasks/user/:userId      tasks owned by a user
/// GET    /api/tasks/overdue           {overdueCount}
/// GET    /api/tasks/total             {totalCount}
/// GET    /api/tasks/completed         {completedCount}
/// GET    /api/tasks/priority          {priorityTasks}
/// GET    /api/tasks/recent-activity   {recentActivities}
/// ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use taskboard_shared::models::task::{Task, TaskStatus, TaskWithCategory};
use taskboard_shared::service::{ActivityEntry, CreateTaskInput, UpdateTaskInput};

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: Option<TaskStatus>,

    /// Owning user; required, validated by the service
    pub user_id: Option<i32>,

    /// Category; required at creation, numeric strings are coerced
    #[serde(default, deserialize_with = "lenient_id_opt")]
    pub category_id: Option<i32>,

    /// Optional calendar-date deadline (YYYY-MM-DD)
    pub deadline: Option<NaiveDate>,
}

/// Full update request; replaces every editable field
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub user_id: i32,

    #[serde(default, deserialize_with = "lenient_id_opt")]
    pub category_id: Option<i32>,

    pub deadline: Option<NaiveDate>,
}

/// Status-only update request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

/// Category-only update request
///
/// Accepts `3` and `"3"` alike; non-numeric input is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(deserialize_with = "lenient_id")]
    pub category_id: i32,
}

/// Per-user query parameter for the aggregate endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<i32>,
}

impl UserIdQuery {
    fn require(self) -> Result<i32, ApiError> {
        self.user_id
            .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))
    }
}

/// Mutation response wrapping the affected task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

/// Confirmation-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueCountResponse {
    pub overdue_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCountResponse {
    pub total_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCountResponse {
    pub completed_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCountResponse {
    pub priority_tasks: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityResponse {
    pub recent_activities: Vec<ActivityEntry>,
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithCategory>>> {
    let tasks = state.tasks.get_all_tasks().await?;
    Ok(Json(tasks))
}

/// `GET /api/tasks/user/:userId`
pub async fn list_tasks_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<TaskWithCategory>>> {
    let tasks = state.tasks.get_all_tasks_by_user(user_id).await?;
    Ok(Json(tasks))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    request.validate()?;

    let task = state
        .tasks
        .create_task(CreateTaskInput {
            title: request.title,
            description: request.description,
            status: request.status,
            user_id: request.user_id,
            category_id: request.category_id,
            deadline: request.deadline,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".to_string(),
            task,
        }),
    ))
}

/// `PUT /api/tasks/:id`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    request.validate()?;

    let task = state
        .tasks
        .update_task(
            id,
            UpdateTaskInput {
                title: request.title,
                description: request.description,
                status: request.status,
                user_id: request.user_id,
                category_id: request.category_id,
                deadline: request.deadline,
            },
        )
        .await?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.tasks.delete_task(id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// `PUT /api/tasks/:id/status`
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.tasks.update_task_status(id, request.status).await?;

    Ok(Json(TaskResponse {
        message: "Task status updated successfully".to_string(),
        task,
    }))
}

/// `PUT /api/tasks/:id/category`
///
/// Returns the snapshot re-read from the store after the write.
pub async fn update_task_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .tasks
        .update_task_category(id, request.category_id)
        .await?;

    Ok(Json(TaskResponse {
        message: "Task category updated successfully".to_string(),
        task,
    }))
}

/// `GET /api/tasks/overdue?userId=`
pub async fn overdue_count(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<OverdueCountResponse>> {
    let user_id = query.require()?;
    let overdue_count = state.tasks.overdue_tasks_count(user_id).await?;
    Ok(Json(OverdueCountResponse { overdue_count }))
}

/// `GET /api/tasks/total?userId=`
pub async fn total_count(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<TotalCountResponse>> {
    let user_id = query.require()?;
    let total_count = state.tasks.total_tasks_count(user_id).await?;
    Ok(Json(TotalCountResponse { total_count }))
}

/// `GET /api/tasks/completed?userId=`
pub async fn completed_count(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<CompletedCountResponse>> {
    let user_id = query.require()?;
    let completed_count = state.tasks.completed_tasks_count(user_id).await?;
    Ok(Json(CompletedCountResponse { completed_count }))
}

/// `GET /api/tasks/priority?userId=`
pub async fn priority_count(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<PriorityCountResponse>> {
    let user_id = query.require()?;
    let priority_tasks = state.tasks.priority_tasks_count(user_id).await?;
    Ok(Json(PriorityCountResponse { priority_tasks }))
}

/// `GET /api/tasks/recent-activity?userId=`
pub async fn recent_activity(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<RecentActivityResponse>> {
    let user_id = query.require()?;
    let recent_activities = state.tasks.recent_activity(user_id).await?;
    Ok(Json(RecentActivityResponse { recent_activities }))
}

/// Deserializes an id given either as a number or a numeric string
fn lenient_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdInput {
        Num(i32),
        Text(String),
    }

    match IdInput::deserialize(deserializer)? {
        IdInput::Num(id) => Ok(id),
        IdInput::Text(text) => text.trim().parse::<i32>().map_err(|_| {
            serde::de::Error::custom(format!("expected a numeric id, got {text:?}"))
        }),
    }
}

fn lenient_id_opt<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "lenient_id")] i32);

    let value = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(value.map(|Wrapper(id)| id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_accepts_camel_case_keys() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "status": "in-progress",
            "userId": 1,
            "categoryId": 2,
            "deadline": "2025-06-01"
        }))
        .unwrap();

        assert_eq!(request.user_id, Some(1));
        assert_eq!(request.category_id, Some(2));
        assert_eq!(request.status, Some(TaskStatus::InProgress));
        assert_eq!(request.deadline, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_empty_title() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "title": "",
            "userId": 1,
            "categoryId": 1
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_category_id_coercion_from_string() {
        let from_number: UpdateCategoryRequest =
            serde_json::from_value(json!({ "categoryId": 3 })).unwrap();
        let from_string: UpdateCategoryRequest =
            serde_json::from_value(json!({ "categoryId": "3" })).unwrap();

        assert_eq!(from_number.category_id, from_string.category_id);
        assert_eq!(from_number.category_id, 3);
    }

    #[test]
    fn test_category_id_rejects_non_numeric_input() {
        let result = serde_json::from_value::<UpdateCategoryRequest>(json!({
            "categoryId": "three"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_coerces_string_category_id() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "title": "t",
            "userId": 1,
            "categoryId": "5"
        }))
        .unwrap();

        assert_eq!(request.category_id, Some(5));
    }

    #[test]
    fn test_aggregate_response_keys() {
        let json = serde_json::to_value(OverdueCountResponse { overdue_count: 2 }).unwrap();
        assert_eq!(json, json!({ "overdueCount": 2 }));

        let json = serde_json::to_value(TotalCountResponse { total_count: 9 }).unwrap();
        assert_eq!(json, json!({ "totalCount": 9 }));

        let json = serde_json::to_value(CompletedCountResponse { completed_count: 4 }).unwrap();
        assert_eq!(json, json!({ "completedCount": 4 }));

        let json = serde_json::to_value(PriorityCountResponse { priority_tasks: 1 }).unwrap();
        assert_eq!(json, json!({ "priorityTasks": 1 }));
    }

    #[test]
    fn test_user_id_query_requires_value() {
        let query = UserIdQuery { user_id: None };
        assert!(query.require().is_err());

        let query = UserIdQuery { user_id: Some(8) };
        assert_eq!(query.require().unwrap(), 8);
    }
}
