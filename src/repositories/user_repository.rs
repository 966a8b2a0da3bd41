//! Repositorio de perfiles y roles
//!
//! El perfil y su rol viven en tablas separadas (profiles / user_roles);
//! el alta de un usuario crea ambas filas en una transacción.

use crate::models::auth::{AppRole, Profile, TenantType, UserWithRole};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM profiles WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Crear perfil + rol en una transacción
    pub async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        tenant_type: TenantType,
        role: AppRole,
    ) -> Result<Profile, AppError> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, email, full_name, tenant_type, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(full_name)
        .bind(tenant_type.as_str())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_roles (id, user_id, role) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(profile.id)
            .bind(role.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    /// Rol del usuario; viewer si no tiene fila de rol
    pub async fn find_role(&self, user_id: Uuid) -> Result<AppRole, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row
            .and_then(|(role,)| AppRole::parse_str(&role))
            .unwrap_or(AppRole::Viewer))
    }

    pub async fn update_role(&self, role_id: Uuid, role: AppRole) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE user_roles SET role = $2 WHERE id = $1")
            .bind(role_id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User role not found".to_string()));
        }

        Ok(())
    }

    pub async fn list_with_roles(&self) -> Result<Vec<UserWithRole>, AppError> {
        let users = sqlx::query_as::<_, UserWithRole>(
            r#"
            SELECT p.id, p.email, p.full_name, p.tenant_type, r.role, r.id AS role_id
            FROM profiles p
            JOIN user_roles r ON r.user_id = p.id
            ORDER BY p.email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
