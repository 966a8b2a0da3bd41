//! Rutas del tenant demo

use axum::{extract::State, routing::post, Extension, Json, Router};

use crate::dto::common::ApiResponse;
use crate::models::auth::{AuthUser, TenantType};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::vehicle_task_repository::VehicleTaskRepository;
use crate::services::seed_service::{SeedService, SeedSummary};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_demo_router() -> Router<AppState> {
    Router::new().route("/seed", post(seed_demo_data))
}

/// Siembra la flota de muestra para el usuario demo autenticado
async fn seed_demo_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<SeedSummary>>, AppError> {
    let service = SeedService::new(
        UserRepository::new(state.pool.clone()),
        VehicleRepository::new(state.pool.clone(), TenantType::Demo),
        VehicleTaskRepository::new(state.pool.clone(), TenantType::Demo),
    );

    let summary = service.seed_demo_data(user.id).await?;

    Ok(Json(ApiResponse::success_with_message(
        summary,
        "Datos demo sembrados exitosamente".to_string(),
    )))
}
