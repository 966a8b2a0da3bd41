//! Rutas de sincronización Smartsheet

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::sync_controller::SyncController;
use crate::dto::common::ApiResponse;
use crate::dto::sync_dto::{
    AddSyncConfigRequest, SheetFetchOutcome, SheetIdsRequest, SheetInfo, SheetSyncOutcome,
    ToggleSyncRequest,
};
use crate::models::auth::AuthUser;
use crate::models::sync::{SyncConfig, SyncLog};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_sync_router() -> Router<AppState> {
    Router::new()
        .route("/sheets", get(list_sheets))
        .route("/sheets/:id/export", get(export_sheet))
        .route("/fetch", post(fetch_sheets))
        .route("/sync", post(sync_sheets))
        .route("/configs", get(list_configs))
        .route("/configs", post(add_config))
        .route("/configs/:id", put(toggle_config))
        .route("/logs", get(list_logs))
}

async fn list_sheets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SheetInfo>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.list_sheets(&user).await?;
    Ok(Json(response))
}

async fn fetch_sheets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SheetIdsRequest>,
) -> Result<Json<Vec<SheetFetchOutcome>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.fetch_sheets(&user, request.sheet_ids).await?;
    Ok(Json(response))
}

async fn sync_sheets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SheetIdsRequest>,
) -> Result<Json<Vec<SheetSyncOutcome>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.sync_sheets(&user, request.sheet_ids).await?;
    Ok(Json(response))
}

/// Descarga de una hoja como text/csv
async fn export_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let (filename, csv) = controller.export_sheet_csv(&user, &id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

async fn add_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AddSyncConfigRequest>,
) -> Result<Json<ApiResponse<SyncConfig>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.add_config(&user, request).await?;
    Ok(Json(response))
}

async fn list_configs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SyncConfig>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.list_configs(&user).await?;
    Ok(Json(response))
}

async fn toggle_config(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ToggleSyncRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.toggle_config(&user, id, request).await?;
    Ok(Json(response))
}

async fn list_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SyncLog>>, AppError> {
    let controller = SyncController::new(state.pool.clone(), &state.config, state.http_client.clone());
    let response = controller.list_logs(&user).await?;
    Ok(Json(response))
}
