//! Rutas de invitaciones (árbol protegido, solo admin)

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::invitation_controller::InvitationController;
use crate::dto::common::ApiResponse;
use crate::dto::invitation_dto::{CreateInvitationRequest, InvitationResponse};
use crate::models::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invitation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invitation))
        .route("/", get(list_invitations))
}

async fn create_invitation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<Json<ApiResponse<InvitationResponse>>, AppError> {
    let controller =
        InvitationController::new(state.pool.clone(), state.config.clone(), state.http_client.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_invitations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<InvitationResponse>>, AppError> {
    let controller =
        InvitationController::new(state.pool.clone(), state.config.clone(), state.http_client.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}
