//! Repositorio de invitaciones

use crate::models::auth::AppRole;
use crate::models::invitation::{Invitation, InvitationStatus};
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        email: &str,
        role: AppRole,
        token: &str,
        invited_by: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invitation, AppError> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (id, email, role, token, invited_by, status, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(role.as_str())
        .bind(token)
        .bind(invited_by)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError> {
        let invitation =
            sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(invitation)
    }

    pub async fn pending_exists_for_email(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM invitations WHERE email = $1 AND status = 'pending')",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn mark_status(&self, id: Uuid, status: InvitationStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE invitations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Invitation>, AppError> {
        let invitations =
            sqlx::query_as::<_, Invitation>("SELECT * FROM invitations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(invitations)
    }
}
