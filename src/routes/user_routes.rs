//! Rutas de administración de usuarios

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::user_controller::UserController;
use crate::dto::common::ApiResponse;
use crate::models::auth::{AuthUser, UserWithRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/roles/:role_id", put(change_role))
}

#[derive(Debug, Deserialize)]
struct ChangeRoleBody {
    role: String,
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserWithRole>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn change_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(role_id): Path<Uuid>,
    Json(body): Json<ChangeRoleBody>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.change_role(&user, role_id, &body.role).await?;
    Ok(Json(response))
}
