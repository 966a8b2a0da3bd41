//! Gate de autorización por rol y tenant
//!
//! Predicados de capacidad puros y sin estado. Para la UI son pistas de
//! renderizado; en el servidor todo endpoint mutante los re-verifica a
//! partir del JWT antes de escribir, sin confiar en nada del cliente.

use crate::config::environment::EntryMode;
use crate::models::auth::{AppRole, AuthUser, TenantType};
use crate::utils::errors::{AppError, AppResult};

/// Puede crear/editar vehículos: admin, supervisor o technician
pub fn can_edit_vehicles(role: AppRole) -> bool {
    matches!(role, AppRole::Admin | AppRole::Supervisor | AppRole::Technician)
}

/// Puede aprobar tareas: admin o supervisor
pub fn can_approve(role: AppRole) -> bool {
    matches!(role, AppRole::Admin | AppRole::Supervisor)
}

/// Es administrador
pub fn is_admin(role: AppRole) -> bool {
    matches!(role, AppRole::Admin)
}

/// Puede operar la sincronización externa: solo staff interno con
/// rol admin o supervisor
pub fn can_manage_sync(tenant: TenantType, role: AppRole) -> bool {
    tenant == TenantType::Internal && can_approve(role)
}

/// Regla de ruteo por tenant.
///
/// El entry mode del despliegue restringe qué árbol de rutas existe y
/// prevalece sobre el tenant del usuario cuando difieren: en un
/// despliegue internal-only un usuario demo no entra a ningún lado,
/// y viceversa. En landing cada tenant entra solo a su propio árbol.
pub fn tenant_allowed(entry_mode: EntryMode, tenant: TenantType) -> bool {
    match entry_mode {
        EntryMode::Landing => true,
        EntryMode::Internal => tenant == TenantType::Internal,
        EntryMode::Demo => tenant == TenantType::Demo,
    }
}

/// Verificación server-side: editar vehículos
pub fn require_edit_vehicles(user: &AuthUser) -> AppResult<()> {
    if can_edit_vehicles(user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Role is not allowed to edit vehicles".to_string(),
        ))
    }
}

/// Verificación server-side: aprobar tareas
pub fn require_approver(user: &AuthUser) -> AppResult<()> {
    if can_approve(user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Role is not allowed to approve tasks".to_string(),
        ))
    }
}

/// Verificación server-side: acciones de admin
pub fn require_admin(user: &AuthUser) -> AppResult<()> {
    if is_admin(user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

/// Verificación server-side: acciones de sincronización
pub fn require_sync_operator(user: &AuthUser) -> AppResult<()> {
    if can_manage_sync(user.tenant_type, user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Sync actions require an internal admin or supervisor".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_matrix() {
        assert!(can_edit_vehicles(AppRole::Admin));
        assert!(can_edit_vehicles(AppRole::Supervisor));
        assert!(can_edit_vehicles(AppRole::Technician));
        assert!(!can_edit_vehicles(AppRole::Viewer));

        assert!(can_approve(AppRole::Admin));
        assert!(can_approve(AppRole::Supervisor));
        assert!(!can_approve(AppRole::Technician));
        assert!(!can_approve(AppRole::Viewer));

        assert!(is_admin(AppRole::Admin));
        assert!(!is_admin(AppRole::Supervisor));
    }

    #[test]
    fn test_sync_gate_requires_internal_tenant() {
        assert!(can_manage_sync(TenantType::Internal, AppRole::Admin));
        assert!(can_manage_sync(TenantType::Internal, AppRole::Supervisor));
        assert!(!can_manage_sync(TenantType::Internal, AppRole::Technician));
        // El rol no alcanza si el tenant es demo
        assert!(!can_manage_sync(TenantType::Demo, AppRole::Admin));
        assert!(!can_manage_sync(TenantType::Demo, AppRole::Supervisor));
    }

    #[test]
    fn test_tenant_entry_mode_matrix() {
        // landing admite ambos tenants
        assert!(tenant_allowed(EntryMode::Landing, TenantType::Internal));
        assert!(tenant_allowed(EntryMode::Landing, TenantType::Demo));
        // internal-only excluye demo, sin importar el rol
        assert!(tenant_allowed(EntryMode::Internal, TenantType::Internal));
        assert!(!tenant_allowed(EntryMode::Internal, TenantType::Demo));
        // demo-only excluye internal
        assert!(tenant_allowed(EntryMode::Demo, TenantType::Demo));
        assert!(!tenant_allowed(EntryMode::Demo, TenantType::Internal));
    }
}
