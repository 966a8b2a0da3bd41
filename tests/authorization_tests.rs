//! Matriz de autorización por rol, tenant y entry mode

use uuid::Uuid;

use fleet_command::config::environment::EntryMode;
use fleet_command::models::auth::{AppRole, AuthUser, TenantType};
use fleet_command::services::authorization_service::{
    can_approve, can_edit_vehicles, can_manage_sync, is_admin, require_admin, require_approver,
    require_edit_vehicles, require_sync_operator, tenant_allowed,
};
use fleet_command::services::jwt_service::JwtService;

fn user(role: AppRole, tenant: TenantType) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "someone@fleet.example.com".to_string(),
        role,
        tenant_type: tenant,
    }
}

#[test]
fn capability_predicates_per_role() {
    let cases = [
        // (rol, edita, aprueba, admin)
        (AppRole::Admin, true, true, true),
        (AppRole::Supervisor, true, true, false),
        (AppRole::Technician, true, false, false),
        (AppRole::Viewer, false, false, false),
    ];

    for (role, edits, approves, admin) in cases {
        assert_eq!(can_edit_vehicles(role), edits, "{:?}", role);
        assert_eq!(can_approve(role), approves, "{:?}", role);
        assert_eq!(is_admin(role), admin, "{:?}", role);
    }
}

#[test]
fn server_side_checks_mirror_predicates() {
    assert!(require_edit_vehicles(&user(AppRole::Technician, TenantType::Internal)).is_ok());
    assert!(require_edit_vehicles(&user(AppRole::Viewer, TenantType::Internal)).is_err());

    assert!(require_approver(&user(AppRole::Supervisor, TenantType::Internal)).is_ok());
    assert!(require_approver(&user(AppRole::Technician, TenantType::Internal)).is_err());

    assert!(require_admin(&user(AppRole::Admin, TenantType::Internal)).is_ok());
    assert!(require_admin(&user(AppRole::Supervisor, TenantType::Internal)).is_err());
}

#[test]
fn sync_actions_require_internal_admin_or_supervisor() {
    assert!(require_sync_operator(&user(AppRole::Admin, TenantType::Internal)).is_ok());
    assert!(require_sync_operator(&user(AppRole::Supervisor, TenantType::Internal)).is_ok());
    assert!(require_sync_operator(&user(AppRole::Technician, TenantType::Internal)).is_err());
    // Un admin demo no sincroniza: el tenant manda
    assert!(require_sync_operator(&user(AppRole::Admin, TenantType::Demo)).is_err());
    assert!(can_manage_sync(TenantType::Internal, AppRole::Supervisor));
    assert!(!can_manage_sync(TenantType::Demo, AppRole::Admin));
}

#[test]
fn tenant_routing_is_role_independent() {
    // El tenant demo queda fuera del árbol interno para todos los roles
    for _role in [AppRole::Admin, AppRole::Supervisor, AppRole::Technician, AppRole::Viewer] {
        assert!(!tenant_allowed(EntryMode::Internal, TenantType::Demo));
        assert!(!tenant_allowed(EntryMode::Demo, TenantType::Internal));
    }

    assert!(tenant_allowed(EntryMode::Landing, TenantType::Internal));
    assert!(tenant_allowed(EntryMode::Landing, TenantType::Demo));
    assert!(tenant_allowed(EntryMode::Internal, TenantType::Internal));
    assert!(tenant_allowed(EntryMode::Demo, TenantType::Demo));
}

#[test]
fn jwt_carries_role_and_tenant_for_server_side_rechecks() {
    let jwt = JwtService::new("integration-test-secret", 1);
    let original = user(AppRole::Supervisor, TenantType::Internal);

    let token = jwt.generate_access_token(&original).unwrap();
    let decoded = jwt.authenticate(&token).unwrap();

    assert_eq!(decoded.id, original.id);
    assert_eq!(decoded.role, AppRole::Supervisor);
    assert_eq!(decoded.tenant_type, TenantType::Internal);

    // Las capacidades se derivan del token, nunca del cliente
    assert!(can_approve(decoded.role));
    assert!(require_sync_operator(&decoded).is_ok());
}

#[test]
fn tampered_token_is_rejected() {
    let jwt = JwtService::new("integration-test-secret", 1);
    let original = user(AppRole::Viewer, TenantType::Demo);

    let mut token = jwt.generate_access_token(&original).unwrap();
    // Corromper la firma
    let last = token.pop().unwrap();
    token.push(if last == 'A' { 'B' } else { 'A' });

    assert!(jwt.authenticate(&token).is_err());
}
