//! Rutas del workflow de tareas y templates

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::task_controller::TaskController;
use crate::dto::common::ApiResponse;
use crate::dto::task_dto::{
    AssignTaskRequest, CreateTemplateRequest, TaskResponse, UpdateTaskStatusRequest,
};
use crate::models::auth::AuthUser;
use crate::models::task::TaskTemplate;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_task_router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates))
        .route("/templates", post(create_template))
        .route("/:id/status", put(update_task_status))
        .route("/:id/assign", put(assign_task))
        .route("/:id/dependency", get(dependency_state))
}

async fn list_templates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TaskTemplate>>, AppError> {
    let controller = TaskController::new(state.pool.clone(), &user);
    let response = controller.list_templates().await?;
    Ok(Json(response))
}

async fn create_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<Json<ApiResponse<TaskTemplate>>, AppError> {
    let controller = TaskController::new(state.pool.clone(), &user);
    let response = controller.create_template(&user, request).await?;
    Ok(Json(response))
}

async fn update_task_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>, AppError> {
    let controller = TaskController::new(state.pool.clone(), &user);
    let response = controller.update_status(&user, id, request).await?;
    Ok(Json(response))
}

async fn assign_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>, AppError> {
    let controller = TaskController::new(state.pool.clone(), &user);
    let response = controller.assign(&user, id, request).await?;
    Ok(Json(response))
}

async fn dependency_state(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = TaskController::new(state.pool.clone(), &user);
    let satisfied = controller.dependency_state(id).await?;
    Ok(Json(serde_json::json!({ "dependency_satisfied": satisfied })))
}
