//! Rutas de inspecciones

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::inspection_controller::InspectionController;
use crate::dto::common::ApiResponse;
use crate::dto::inspection_dto::{CreateInspectionRequest, RecordInspectionResultRequest};
use crate::models::auth::AuthUser;
use crate::models::inspection::Inspection;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inspection_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_inspection))
        .route("/:id/result", put(record_result))
}

async fn create_inspection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateInspectionRequest>,
) -> Result<Json<ApiResponse<Inspection>>, AppError> {
    let controller = InspectionController::new(state.pool.clone(), &user);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn record_result(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordInspectionResultRequest>,
) -> Result<Json<ApiResponse<Inspection>>, AppError> {
    let controller = InspectionController::new(state.pool.clone(), &user);
    let response = controller.record_result(&user, id, request).await?;
    Ok(Json(response))
}
