//! Controller de invitaciones

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::LoginResponse;
use crate::dto::common::ApiResponse;
use crate::dto::invitation_dto::{
    AcceptInvitationRequest, CreateInvitationRequest, InvitationResponse,
};
use crate::models::auth::{AppRole, AuthUser};
use crate::repositories::invitation_repository::InvitationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_service::AuthService;
use crate::services::authorization_service::require_admin;
use crate::services::invitation_service::InvitationService;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{bad_request_error, AppResult};
use validator::Validate;

pub struct InvitationController {
    service: InvitationService,
    auth_service: AuthService,
}

impl InvitationController {
    pub fn new(pool: PgPool, config: EnvironmentConfig, http_client: reqwest::Client) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        Self {
            service: InvitationService::new(
                InvitationRepository::new(pool.clone()),
                http_client,
                config.resend_api_key.clone(),
                config.invitation_from.clone(),
                config.app_origin.clone(),
            ),
            auth_service: AuthService::new(UserRepository::new(pool), jwt),
        }
    }

    /// Crear y enviar una invitación (solo admin)
    pub async fn create(
        &self,
        user: &AuthUser,
        request: CreateInvitationRequest,
    ) -> AppResult<ApiResponse<InvitationResponse>> {
        require_admin(user)?;

        let role = AppRole::parse_str(&request.role)
            .ok_or_else(|| bad_request_error("Invalid role"))?;

        let invitation = self
            .service
            .create_invitation(&request.email, role, user.id)
            .await?;

        Ok(ApiResponse::success_with_message(
            invitation,
            "Invitación enviada exitosamente".to_string(),
        ))
    }

    pub async fn list(&self, user: &AuthUser) -> AppResult<Vec<InvitationResponse>> {
        require_admin(user)?;
        self.service.list_invitations().await
    }

    /// Aceptación pública por token (el invitado todavía no tiene sesión)
    pub async fn accept(&self, request: AcceptInvitationRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        self.service.accept_invitation(&self.auth_service, request).await
    }
}
