use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use todo_core::{TODO_NOT_FOUND, TodoError, TodoService};
use todo_db::models::TodoPatch;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound { .. } => Self::not_found(TODO_NOT_FOUND),
            TodoError::Upstream(e) => Self::internal(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateTodoBody {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTodosBody {
    pub goal: String,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Path IDs that are not UUIDs cannot name a stored todo.
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(TODO_NOT_FOUND))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(service: TodoService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todo", get(list_todos).post(create_todo))
        .route("/todo/summary", get(summary))
        .route("/todo/generate", post(generate_todos))
        .route("/todo/{id}", put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(service: TodoService, bind: &str, port: u16) -> Result<()> {
    tracing::info!(?service, "starting todo service");
    let app = build_router(service);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("todo serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("todo serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_todos(
    State(service): State<TodoService>,
) -> Result<axum::response::Response, AppError> {
    let todos = service.list().await?;
    Ok(Json(todos).into_response())
}

async fn summary(State(service): State<TodoService>) -> Result<axum::response::Response, AppError> {
    let counts = service.summary().await?;
    Ok(Json(counts).into_response())
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<CreateTodoBody>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(body) = body?;
    require_non_empty("title", &body.title)?;

    let todo = service.create(&body.title).await?;
    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_todo_id(&id)?;
    let Json(patch) = body?;
    if let Some(title) = &patch.title {
        require_non_empty("title", title)?;
    }

    let todo = service.update(id, &patch).await?;
    Ok(Json(todo).into_response())
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = parse_todo_id(&id)?;
    let todo = service.delete(id).await?;
    Ok(Json(todo).into_response())
}

async fn generate_todos(
    State(service): State<TodoService>,
    body: Result<Json<GenerateTodosBody>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(body) = body?;
    require_non_empty("goal", &body.goal)?;

    let outcome = service.generate(&body.goal).await?;
    Ok((StatusCode::CREATED, Json(outcome)).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
