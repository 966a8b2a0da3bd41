//! Modelos de identidad: roles, tenants, perfiles y claims JWT
//!
//! El rol es uno de cuatro valores fijos (sin permisos custom) y el
//! tenant_type particiona la base de usuarios entre staff interno y demo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roles del sistema - mapea al ENUM app_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    Supervisor,
    Technician,
    Viewer,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::Supervisor => "supervisor",
            AppRole::Technician => "technician",
            AppRole::Viewer => "viewer",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(AppRole::Admin),
            "supervisor" => Some(AppRole::Supervisor),
            "technician" => Some(AppRole::Technician),
            "viewer" => Some(AppRole::Viewer),
            _ => None,
        }
    }
}

/// Partición de usuarios - mapea al ENUM tenant_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantType {
    Internal,
    Demo,
}

impl TenantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantType::Internal => "internal",
            TenantType::Demo => "demo",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(TenantType::Internal),
            "demo" => Some(TenantType::Demo),
            _ => None,
        }
    }

    /// Nombre de tabla para este tenant: el tenant demo opera sobre
    /// el set paralelo de tablas con prefijo `demo_`.
    pub fn table(&self, base: &str) -> String {
        match self {
            TenantType::Internal => base.to_string(),
            TenantType::Demo => format!("demo_{}", base),
        }
    }
}

/// Perfil de usuario - mapea a la tabla profiles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub tenant_type: String,
    // El hash nunca sale en una response
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Proyección de usuario + rol para administración
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserWithRole {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub tenant_type: String,
    pub role: String,
    pub role_id: Uuid,
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user id
    pub email: String,
    pub role: String,
    pub tenant_type: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Identidad resuelta de la sesión, insertada como extensión de request
/// por el middleware de autenticación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: AppRole,
    pub tenant_type: TenantType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for r in ["admin", "supervisor", "technician", "viewer"] {
            assert_eq!(AppRole::parse_str(r).unwrap().as_str(), r);
        }
        assert!(AppRole::parse_str("super_admin").is_none());
    }

    #[test]
    fn test_tenant_table_prefix() {
        assert_eq!(TenantType::Internal.table("vehicles"), "vehicles");
        assert_eq!(TenantType::Demo.table("vehicles"), "demo_vehicles");
        assert_eq!(TenantType::Demo.table("vehicle_tasks"), "demo_vehicle_tasks");
    }
}
