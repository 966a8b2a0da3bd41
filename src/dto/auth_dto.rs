//! DTOs de autenticación y capacidades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::AuthUser;

/// Request de alta de usuario (signup demo o aceptación de invitación)
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 255))]
    pub email: String,

    // Política de password validada en utils::validation
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

/// Request de login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<AuthUser>,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request de refresh token
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
}

/// Response de refresh token
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
}

/// Predicados de capacidad para la UI
///
/// Son pistas de renderizado: la frontera de seguridad real es la
/// re-verificación server-side en cada endpoint mutante.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub role: String,
    pub tenant_type: String,
    pub can_edit_vehicles: bool,
    pub can_approve: bool,
    pub is_admin: bool,
    pub can_manage_sync: bool,
}
