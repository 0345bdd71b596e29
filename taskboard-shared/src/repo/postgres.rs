/// PostgreSQL task repository
///
/// All SQL for the task table lives here. Queries return full row
/// snapshots via `RETURNING` so callers never observe half-applied state,
/// and partial updates are assembled dynamically so unnamed columns are
/// left untouched.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::TaskError;
use crate::models::category::Category;
use crate::models::task::{
    NewTask, RecentTaskRow, Task, TaskCountFilter, TaskPatch, TaskWithCategory,
};
use crate::repo::TaskRepository;

const TASK_COLUMNS: &str =
    "id, title, description, status, user_id, category_id, deadline, created_at, updated_at";

/// Task repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Creates a repository over an injected connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_joined(&self, user_id: Option<i32>) -> Result<Vec<TaskWithCategory>, TaskError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.user_id, t.category_id,
                   t.deadline, t.created_at, t.updated_at,
                   c.id AS joined_category_id, c.name AS joined_category_name
            FROM tasks t
            LEFT JOIN categories c ON c.id = t.category_id
            "#,
        );

        if let Some(user_id) = user_id {
            qb.push(" WHERE t.user_id = ");
            qb.push_bind(user_id);
        }

        qb.push(" ORDER BY t.created_at DESC");

        let rows: Vec<TaskCategoryRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(TaskWithCategory::from).collect())
    }
}

/// Flat row shape for the task/category join; the category columns are
/// aliased to avoid colliding with the task's own `category_id`
#[derive(Debug, sqlx::FromRow)]
struct TaskCategoryRow {
    #[sqlx(flatten)]
    task: Task,
    joined_category_id: Option<i32>,
    joined_category_name: Option<String>,
}

impl From<TaskCategoryRow> for TaskWithCategory {
    fn from(row: TaskCategoryRow) -> Self {
        let category = match (row.joined_category_id, row.joined_category_name) {
            (Some(id), Some(name)) => Some(Category { id, name }),
            _ => None,
        };
        TaskWithCategory {
            task: row.task,
            category,
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_all(&self) -> Result<Vec<TaskWithCategory>, TaskError> {
        self.find_joined(None).await
    }

    async fn find_all_by_user(&self, user_id: i32) -> Result<Vec<TaskWithCategory>, TaskError> {
        self.find_joined(Some(user_id)).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, user_id, category_id, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.user_id)
        .bind(task.category_id)
        .bind(task.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update(&self, id: i32, patch: TaskPatch) -> Result<Option<Task>, TaskError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = patch.title {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(user_id) = patch.user_id {
            qb.push(", user_id = ");
            qb.push_bind(user_id);
        }
        if let Some(category_id) = patch.category_id {
            qb.push(", category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(deadline) = patch.deadline {
            qb.push(", deadline = ");
            qb.push_bind(deadline);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {TASK_COLUMNS}"));

        let task = qb.build_query_as::<Task>().fetch_optional(&self.pool).await?;

        Ok(task)
    }

    async fn delete(&self, id: i32) -> Result<bool, TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filter: TaskCountFilter) -> Result<i64, TaskError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM tasks WHERE user_id = ");
        qb.push_bind(filter.user_id);

        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        if let Some(status) = filter.status_not {
            qb.push(" AND status <> ");
            qb.push_bind(status);
        }
        if let Some(bound) = filter.deadline_before {
            qb.push(" AND deadline < ");
            qb.push_bind(bound);
        }
        if let Some(bound) = filter.deadline_on_or_before {
            qb.push(" AND deadline <= ");
            qb.push_bind(bound);
        }

        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(count)
    }

    async fn recent_by_user(
        &self,
        user_id: i32,
        limit: i64,
    ) -> Result<Vec<RecentTaskRow>, TaskError> {
        let rows = sqlx::query_as::<_, RecentTaskRow>(
            r#"
            SELECT t.title, t.status, t.updated_at,
                   c.name AS category_name, u.username
            FROM tasks t
            LEFT JOIN categories c ON c.id = t.category_id
            LEFT JOIN users u ON u.id = t.user_id
            WHERE t.user_id = $1
            ORDER BY t.updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
