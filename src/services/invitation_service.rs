//! Servicio de invitaciones
//!
//! Un admin invita por email con un token aleatorio de un solo uso que
//! expira a los 7 días. El email sale por la API de Resend con el link
//! de aceptación; la aceptación crea el usuario interno con el rol
//! invitado y consume el token.

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use serde_json::json;

use crate::dto::auth_dto::{LoginResponse, SignupRequest};
use crate::dto::invitation_dto::{AcceptInvitationRequest, InvitationResponse};
use crate::models::auth::{AppRole, TenantType};
use crate::models::invitation::{Invitation, InvitationStatus};
use crate::repositories::invitation_repository::InvitationRepository;
use crate::services::auth_service::AuthService;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::validation::validate_email;
use chrono::Utc;
use uuid::Uuid;

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";
const TOKEN_LENGTH: usize = 48;

pub struct InvitationService {
    invitations: InvitationRepository,
    http_client: Client,
    resend_api_key: Option<String>,
    invitation_from: String,
    app_origin: String,
}

impl InvitationService {
    pub fn new(
        invitations: InvitationRepository,
        http_client: Client,
        resend_api_key: Option<String>,
        invitation_from: String,
        app_origin: String,
    ) -> Self {
        Self {
            invitations,
            http_client,
            resend_api_key,
            invitation_from,
            app_origin,
        }
    }

    /// Crear y enviar una invitación (el caller ya verificó rol admin)
    pub async fn create_invitation(
        &self,
        email: &str,
        role: AppRole,
        invited_by: Uuid,
    ) -> AppResult<InvitationResponse> {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|_| {
            AppError::BadRequest("Invalid email address".to_string())
        })?;

        if self.invitations.pending_exists_for_email(&email).await? {
            return Err(conflict_error("Invitation", "email", &email));
        }

        let token = generate_token();
        let expires_at = Invitation::expiry_from(Utc::now());

        let invitation = self
            .invitations
            .create(&email, role, &token, invited_by, expires_at)
            .await?;

        log::info!("✉️  Invitación creada para {} con rol {}", email, role.as_str());

        self.send_invitation_email(&email, role, &token).await?;

        Ok(to_response(invitation))
    }

    /// Aceptar una invitación pendiente: un solo uso, expira a los 7 días
    pub async fn accept_invitation(
        &self,
        auth_service: &AuthService,
        request: AcceptInvitationRequest,
    ) -> AppResult<LoginResponse> {
        let invitation = self
            .invitations
            .find_by_token(&request.token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        match InvitationStatus::parse_str(&invitation.status) {
            Some(InvitationStatus::Pending) => {}
            Some(InvitationStatus::Accepted) => {
                return Err(AppError::Conflict("Invitation was already used".to_string()));
            }
            _ => {
                return Err(AppError::BadRequest("Invitation is no longer valid".to_string()));
            }
        }

        if invitation.is_expired(Utc::now()) {
            self.invitations
                .mark_status(invitation.id, InvitationStatus::Expired)
                .await?;
            return Err(AppError::BadRequest("Invitation has expired".to_string()));
        }

        let role = AppRole::parse_str(&invitation.role)
            .ok_or_else(|| AppError::Internal("Invitation has an unknown role".to_string()))?;

        let signup = SignupRequest {
            email: invitation.email.clone(),
            password: request.password,
            full_name: request.full_name,
        };

        // Los invitados son siempre staff interno
        let response = auth_service
            .create_user(signup, TenantType::Internal, role)
            .await?;

        self.invitations
            .mark_status(invitation.id, InvitationStatus::Accepted)
            .await?;

        log::info!("✅ Invitación aceptada por {}", invitation.email);

        Ok(response)
    }

    pub async fn list_invitations(&self) -> AppResult<Vec<InvitationResponse>> {
        let invitations = self.invitations.list().await?;
        Ok(invitations.into_iter().map(to_response).collect())
    }

    async fn send_invitation_email(&self, email: &str, role: AppRole, token: &str) -> AppResult<()> {
        let api_key = match &self.resend_api_key {
            Some(key) => key,
            None => {
                // Sin API key el email no sale, pero la invitación queda creada
                log::warn!("⚠️  RESEND_API_KEY no configurada, invitación sin email");
                return Ok(());
            }
        };

        let invitation_url = format!("{}/auth?invitation={}", self.app_origin, token);

        let body = json!({
            "from": self.invitation_from,
            "to": [email],
            "subject": "You're invited to Fleet Command",
            "html": format!(
                "<h1>Welcome to Fleet Command</h1>\
                 <p>You've been invited to join Fleet Command with the role of <strong>{}</strong>.</p>\
                 <p><a href=\"{}\">Accept Invitation</a></p>\
                 <p>This invitation will expire in 7 days. If you didn't expect this invitation, \
                 you can safely ignore this email.</p>",
                role.as_str(),
                invitation_url
            ),
        });

        let response = self
            .http_client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Resend request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            log::error!("❌ Resend devolvió {}: {}", status, text);
            return Err(AppError::ExternalApi(format!(
                "Failed to send invitation email: {}",
                status
            )));
        }

        log::info!("📨 Email de invitación enviado a {}", email);

        Ok(())
    }
}

/// Token aleatorio alfanumérico para el link de aceptación
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn to_response(invitation: Invitation) -> InvitationResponse {
    InvitationResponse {
        id: invitation.id,
        email: invitation.email,
        role: invitation.role,
        status: invitation.status,
        expires_at: invitation.expires_at,
        created_at: invitation.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        // Dos tokens consecutivos no colisionan
        assert_ne!(generate_token(), generate_token());
    }
}
