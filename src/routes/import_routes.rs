//! Rutas del import CSV
//!
//! El body es el texto CSV crudo; el reporte devuelve el conteo de
//! filas persistidas y la lista ordenada de errores.

use axum::{extract::State, routing::post, Extension, Json, Router};

use crate::controllers::import_controller::ImportController;
use crate::dto::import_dto::ImportReport;
use crate::models::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_import_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", post(import_vehicles))
        .route("/task-templates", post(import_task_templates))
}

async fn import_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    csv: String,
) -> Result<Json<ImportReport>, AppError> {
    let controller = ImportController::new(state.pool.clone(), &user);
    let report = controller.import_vehicles(&user, &csv).await?;
    Ok(Json(report))
}

async fn import_task_templates(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    csv: String,
) -> Result<Json<ImportReport>, AppError> {
    let controller = ImportController::new(state.pool.clone(), &user);
    let report = controller.import_task_templates(&user, &csv).await?;
    Ok(Json(report))
}
