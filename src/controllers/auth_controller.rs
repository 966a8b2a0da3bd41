//! Controller de autenticación y capacidades

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{
    CapabilitiesResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    SignupRequest,
};
use crate::models::auth::AuthUser;
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_service::AuthService;
use crate::services::authorization_service::{can_approve, can_edit_vehicles, can_manage_sync, is_admin};
use crate::services::jwt_service::JwtService;
use crate::utils::errors::AppResult;

pub struct AuthController {
    service: AuthService,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        Self {
            service: AuthService::new(UserRepository::new(pool), jwt),
            config,
        }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    pub async fn signup_demo(&self, request: SignupRequest) -> AppResult<LoginResponse> {
        self.service.signup_demo(self.config.app_mode, request).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        self.service.login(request).await
    }

    pub fn refresh(&self, request: RefreshTokenRequest) -> RefreshTokenResponse {
        match self.service.refresh(&request.token) {
            Ok(token) => RefreshTokenResponse {
                success: true,
                token: Some(token),
                message: None,
            },
            Err(e) => RefreshTokenResponse {
                success: false,
                token: None,
                message: Some(e.to_string()),
            },
        }
    }

    /// Predicados de capacidad para la UI: pistas de renderizado,
    /// nunca la frontera de seguridad.
    pub fn capabilities(&self, user: &AuthUser) -> CapabilitiesResponse {
        CapabilitiesResponse {
            role: user.role.as_str().to_string(),
            tenant_type: user.tenant_type.as_str().to_string(),
            can_edit_vehicles: can_edit_vehicles(user.role),
            can_approve: can_approve(user.role),
            is_admin: is_admin(user.role),
            can_manage_sync: can_manage_sync(user.tenant_type, user.role),
        }
    }
}
