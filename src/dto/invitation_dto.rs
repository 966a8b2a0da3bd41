//! DTOs de invitaciones

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request para invitar a un usuario (solo admin)
#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: String,
}

/// Request para aceptar una invitación pendiente
#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    #[validate(length(min = 1))]
    pub token: String,

    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

/// Response de invitación (sin el token, que viaja solo por email)
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
