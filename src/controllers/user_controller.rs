//! Controller de administración de usuarios

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::ApiResponse;
use crate::models::auth::{AppRole, AuthUser, UserWithRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service::require_admin;
use crate::utils::errors::{bad_request_error, AppResult};

pub struct UserController {
    users: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthUser) -> AppResult<Vec<UserWithRole>> {
        require_admin(user)?;
        self.users.list_with_roles().await
    }

    /// Cambiar el rol de un usuario a uno de los cuatro valores fijos
    pub async fn change_role(
        &self,
        user: &AuthUser,
        role_id: Uuid,
        new_role: &str,
    ) -> AppResult<ApiResponse<()>> {
        require_admin(user)?;

        let role = AppRole::parse_str(new_role)
            .ok_or_else(|| bad_request_error("Invalid role"))?;

        self.users.update_role(role_id, role).await?;

        log::info!("🔁 Rol {} actualizado a {}", role_id, role.as_str());

        Ok(ApiResponse::success_with_message(
            (),
            "Rol actualizado exitosamente".to_string(),
        ))
    }
}
