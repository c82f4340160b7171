use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::web::AppState;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiInfo {
    message: String,
    version: String,
    routes: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/test-db", get(test_db_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API name, version and entry points", body = ApiInfo),
    ),
    tag = "health"
)]
pub async fn info_handler() -> impl IntoResponse {
    let routes = [
        "/",
        "/health",
        "/test-db",
        "/api/users/register",
        "/api/users/login",
        "/api/users/me",
        "/api/users/progress",
        "/api/users/leaderboard",
        "/api/courses",
        "/api/modules",
        "/api/lesson",
        "/api/vocabulary",
        "/api/exercises",
        "/api/exercise-options",
    ];

    Json(ApiInfo {
        message: String::from("GermanGains API is running"),
        version: API_VERSION.to_string(),
        routes: routes.iter().map(|r| r.to_string()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is alive", body = HealthStatus),
    ),
    tag = "health"
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthStatus {
        status: String::from("OK"),
        timestamp: chrono::Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/test-db",
    responses(
        (status = 200, description = "Database reachable", body = DatabaseStatus),
        (status = 500, description = "Database unreachable", body = DatabaseStatus),
    ),
    tag = "health"
)]
pub async fn test_db_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.pool().database().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(DatabaseStatus {
                status: String::from("Database connected"),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("database ping failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DatabaseStatus {
                    status: String::from("DB connection failed"),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
