//! Servicio de autenticación
//!
//! Alta y login contra las tablas profiles/user_roles con bcrypt.
//! El alta pública solo existe en modo demo; el staff interno entra
//! por invitación.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::config::environment::AppMode;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, SignupRequest};
use crate::models::auth::{AppRole, AuthUser, TenantType};
use crate::repositories::user_repository::UserRepository;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{conflict_error, field_error, AppError, AppResult};
use crate::utils::validation::{validate_email, validate_password};

pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Alta pública de usuario demo. Rechazada fuera del modo demo.
    pub async fn signup_demo(
        &self,
        app_mode: AppMode,
        request: SignupRequest,
    ) -> AppResult<LoginResponse> {
        if !app_mode.public_signup_enabled() {
            return Err(AppError::Forbidden(
                "Public signup is not available in this deployment".to_string(),
            ));
        }

        self.create_user(request, TenantType::Demo, AppRole::Viewer)
            .await
    }

    /// Crear usuario con tenant y rol determinados por el caller
    /// (signup demo o aceptación de invitación).
    pub async fn create_user(
        &self,
        request: SignupRequest,
        tenant_type: TenantType,
        role: AppRole,
    ) -> AppResult<LoginResponse> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email).map_err(|e| field_error("email", e))?;
        validate_password(&request.password).map_err(|e| field_error("password", e))?;

        if self.users.email_exists(&email).await? {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let profile = self
            .users
            .create_user(&email, request.full_name.trim(), &password_hash, tenant_type, role)
            .await?;

        log::info!("👤 Usuario creado: {} ({})", email, tenant_type.as_str());

        let user = AuthUser {
            id: profile.id,
            email: profile.email,
            role,
            tenant_type,
        };

        self.issue_tokens(user)
    }

    /// Login con email y password
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = request.email.trim().to_lowercase();

        let profile = match self.users.find_by_email(&email).await? {
            Some(profile) => profile,
            None => {
                return Ok(LoginResponse {
                    success: false,
                    token: None,
                    refresh_token: None,
                    user: None,
                    message: Some("Invalid email or password".to_string()),
                    expires_at: None,
                })
            }
        };

        let valid = verify(&request.password, &profile.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            log::warn!("🔒 Login fallido para {}", email);
            return Ok(LoginResponse {
                success: false,
                token: None,
                refresh_token: None,
                user: None,
                message: Some("Invalid email or password".to_string()),
                expires_at: None,
            });
        }

        let role = self.users.find_role(profile.id).await?;
        let tenant_type = TenantType::parse_str(&profile.tenant_type)
            .ok_or_else(|| AppError::Internal("Profile has an unknown tenant type".to_string()))?;

        let user = AuthUser {
            id: profile.id,
            email: profile.email,
            role,
            tenant_type,
        };

        log::info!("✅ Login de {} como {}", user.email, role.as_str());

        self.issue_tokens(user)
    }

    /// Refrescar un access token
    pub fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        self.jwt.refresh_access_token(refresh_token)
    }

    fn issue_tokens(&self, user: AuthUser) -> AppResult<LoginResponse> {
        let token = self.jwt.generate_access_token(&user)?;
        let refresh_token = self.jwt.generate_refresh_token(&user)?;
        let expires_at = self.jwt.access_expiry();

        Ok(LoginResponse {
            success: true,
            token: Some(token),
            refresh_token: Some(refresh_token),
            user: Some(user),
            message: None,
            expires_at: Some(expires_at),
        })
    }
}
