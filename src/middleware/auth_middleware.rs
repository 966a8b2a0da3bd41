//! Middleware de autenticación
//!
//! Extrae el Bearer token, valida el JWT y deja la identidad tipada
//! (`AuthUser`) como extensión del request. Acá también se aplica la
//! regla de ruteo por tenant: el entry mode del despliegue prevalece
//! sobre el tenant del usuario cuando difieren.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::services::authorization_service::tenant_allowed;
use crate::services::jwt_service::JwtService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware de autenticación + gate de tenant
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    let jwt_service = JwtService::new(&state.config.jwt_secret, state.config.jwt_expiration_hours);
    let user = jwt_service.authenticate(token)?;

    // El árbol de rutas de este despliegue puede excluir al tenant del
    // usuario sin importar su rol
    if !tenant_allowed(state.config.entry_mode, user.tenant_type) {
        log::warn!(
            "🚷 Usuario {} ({}) rechazado por entry mode",
            user.email,
            user.tenant_type.as_str()
        );
        return Err(AppError::Forbidden(
            "This deployment does not serve your tenant".to_string(),
        ));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
