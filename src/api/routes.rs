//! REST endpoints the voice assistant's tools are pointed at.
//!
//! Each POST route receives the full tool-call webhook, picks out the call
//! it owns and answers with the result envelope.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{MethodRouter, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::store::Database;
use crate::todos::service as todos;
use crate::users::service as users;
use crate::vapi::{Operation, ToolCallRequest, ToolResults, resolve};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

/// Build the Axum router with every webhook route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(slashed("/users", get(list_users).post(create_user)))
        .merge(slashed("/schedules/create_todo", post(create_todo)))
        .merge(slashed("/schedules/get_todos", post(get_todos)))
        .merge(slashed("/schedules/complete_todo", post(complete_todo)))
        .merge(slashed("/schedules/delete_todo", post(delete_todo)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve `handler` at `path` both with and without a trailing slash.
fn slashed(path: &str, handler: MethodRouter<AppState>) -> Router<AppState> {
    Router::new()
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "voice-todo"
    }))
}

// ── Users ───────────────────────────────────────────────────────────────

async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let users = users::list_users(state.db.as_ref()).await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let call = resolve(&req.message.tool_calls, Operation::CreateUser)?;
    users::create_user(state.db.as_ref(), &call.arguments).await?;
    Ok((StatusCode::CREATED, Json(ToolResults::success(call.id))))
}

// ── Todos ───────────────────────────────────────────────────────────────

async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let call = resolve(&req.message.tool_calls, Operation::CreateTodo)?;
    todos::create_todo(state.db.as_ref(), &call.arguments).await?;
    Ok(Json(ToolResults::success(call.id)))
}

async fn get_todos(
    State(state): State<AppState>,
    Json(req): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let call = resolve(&req.message.tool_calls, Operation::GetTodos)?;
    let todos = todos::list_todos(state.db.as_ref(), &call.arguments).await?;
    Ok(Json(ToolResults::single(call.id, todos)))
}

async fn complete_todo(
    State(state): State<AppState>,
    Json(req): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let call = resolve(&req.message.tool_calls, Operation::CompleteTodo)?;
    todos::complete_todo(state.db.as_ref(), &call.arguments).await?;
    Ok(Json(ToolResults::success(call.id)))
}

async fn delete_todo(
    State(state): State<AppState>,
    Json(req): Json<ToolCallRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let call = resolve(&req.message.tool_calls, Operation::DeleteTodo)?;
    todos::delete_todo(state.db.as_ref(), &call.arguments).await?;
    Ok(Json(ToolResults::success(call.id)))
}
