//! Controller de inspecciones

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::inspection_dto::{CreateInspectionRequest, RecordInspectionResultRequest};
use crate::models::auth::AuthUser;
use crate::models::inspection::{Inspection, InspectionResult};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::require_edit_vehicles;
use crate::utils::errors::{bad_request_error, AppError, AppResult};

pub struct InspectionController {
    inspections: InspectionRepository,
    vehicles: VehicleRepository,
}

impl InspectionController {
    pub fn new(pool: PgPool, user: &AuthUser) -> Self {
        Self {
            inspections: InspectionRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool, user.tenant_type),
        }
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        request: CreateInspectionRequest,
    ) -> AppResult<ApiResponse<Inspection>> {
        require_edit_vehicles(user)?;
        request.validate()?;

        self.vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let inspection = self
            .inspections
            .create(
                request.vehicle_id,
                &request.inspection_type,
                request.scheduled_date,
                request.inspector.as_deref(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            inspection,
            "Inspección programada".to_string(),
        ))
    }

    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Inspection>> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        self.inspections.find_by_vehicle(vehicle_id).await
    }

    pub async fn record_result(
        &self,
        user: &AuthUser,
        inspection_id: Uuid,
        request: RecordInspectionResultRequest,
    ) -> AppResult<ApiResponse<Inspection>> {
        require_edit_vehicles(user)?;
        request.validate()?;

        InspectionResult::parse_str(&request.result)
            .ok_or_else(|| bad_request_error("Invalid inspection result"))?;

        self.inspections
            .find_by_id(inspection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inspection not found".to_string()))?;

        let inspection = self
            .inspections
            .record_result(inspection_id, &request.result, request.notes.as_deref())
            .await?;

        Ok(ApiResponse::success_with_message(
            inspection,
            "Resultado registrado".to_string(),
        ))
    }
}
