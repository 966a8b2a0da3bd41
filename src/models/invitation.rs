//! Modelo de Invitation
//!
//! Invitaciones creadas por un admin, con token aleatorio de un solo uso
//! y expiración a los 7 días.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Días de validez de una invitación
pub const INVITATION_EXPIRY_DAYS: i64 = 7;

/// Estado de la invitación - mapea al ENUM invitation_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvitationStatus::Pending),
            "accepted" => Some(InvitationStatus::Accepted),
            "expired" => Some(InvitationStatus::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    pub invited_by: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Fecha de expiración para una invitación creada ahora
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(INVITATION_EXPIRY_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_window() {
        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            email: "tech@fleet.example.com".to_string(),
            role: "technician".to_string(),
            token: "abc".to_string(),
            invited_by: Uuid::new_v4(),
            status: "pending".to_string(),
            expires_at: Invitation::expiry_from(now),
            created_at: now,
        };

        assert!(!invitation.is_expired(now + Duration::days(6)));
        assert!(invitation.is_expired(now + Duration::days(8)));
    }
}
