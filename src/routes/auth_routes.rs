//! Rutas de autenticación
//!
//! Las rutas públicas (login, signup demo, refresh, aceptación de
//! invitación) se montan sin middleware; /capabilities vive en el árbol
//! protegido.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::controllers::invitation_controller::InvitationController;
use crate::dto::auth_dto::{
    CapabilitiesResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    SignupRequest,
};
use crate::dto::invitation_dto::AcceptInvitationRequest;
use crate::models::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas (sin sesión)
pub fn create_public_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup_demo))
        .route("/refresh", post(refresh))
        .route("/accept-invitation", post(accept_invitation))
}

/// Rutas autenticadas
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/capabilities", get(capabilities))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn signup_demo(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.signup_demo(request).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.refresh(request)))
}

async fn accept_invitation(
    State(state): State<AppState>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller =
        InvitationController::new(state.pool.clone(), state.config.clone(), state.http_client.clone());
    let response = controller.accept(request).await?;
    Ok(Json(response))
}

async fn capabilities(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CapabilitiesResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    Ok(Json(controller.capabilities(&user)))
}
