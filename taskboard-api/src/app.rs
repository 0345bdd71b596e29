/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::repo::PgTaskRepository;
use taskboard_shared::service::TaskService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks)
    pub db: PgPool,

    /// Task lifecycle service over the Postgres repository
    pub tasks: TaskService<PgTaskRepository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state, wiring the repository to the pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let tasks = TaskService::new(PgTaskRepository::new(db.clone()));
        Self {
            db,
            tasks,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                         # Health check (public)
/// └── /api/tasks/                     # Task resource
///     ├── GET    /                    # List all tasks
///     ├── POST   /                    # Create task
///     ├── GET    /user/:userId        # List tasks for a user
///     ├── GET    /overdue             # Overdue count
///     ├── GET    /total               # Total count
///     ├── GET    /completed           # Completed count
///     ├── GET    /priority            # Priority count
///     ├── GET    /recent-activity     # Activity feed
///     ├── PUT    /:id                 # Full update
///     ├── DELETE /:id                 # Delete
///     ├── PUT    /:id/status          # Status-only update
///     └── PUT    /:id/category        # Category-only update
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/overdue", get(routes::tasks::overdue_count))
        .route("/total", get(routes::tasks::total_count))
        .route("/completed", get(routes::tasks::completed_count))
        .route("/priority", get(routes::tasks::priority_count))
        .route("/recent-activity", get(routes::tasks::recent_activity))
        .route("/user/:user_id", get(routes::tasks::list_tasks_by_user))
        .route(
            "/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/:id/status", put(routes::tasks::update_task_status))
        .route("/:id/category", put(routes::tasks::update_task_category));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig};

    #[test]
    fn test_cors_origin_selection_is_config_driven() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origins: vec!["http://localhost:5173".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
        };

        assert!(!config.api.cors_origins.contains(&"*".to_string()));
    }
}
