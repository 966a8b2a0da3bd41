//! Controller de vehículos
//!
//! Orquesta validación de dominio, autorización server-side y el
//! disparo del workflow de comisionado cuando un vehículo entra en
//! Commissioning.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters, VehicleResponse,
};
use crate::models::auth::AuthUser;
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleStatus, VehicleType};
use crate::repositories::region_repository::RegionRepository;
use crate::repositories::task_template_repository::TaskTemplateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::vehicle_task_repository::VehicleTaskRepository;
use crate::services::authorization_service::{require_admin, require_edit_vehicles};
use crate::services::commissioning_service::CommissioningService;
use crate::utils::errors::{bad_request_error, conflict_error, field_error, AppError, AppResult};
use crate::utils::validation::{validate_vin, validate_year};

pub struct VehicleController {
    vehicles: VehicleRepository,
    regions: RegionRepository,
    commissioning: CommissioningService,
}

impl VehicleController {
    /// Los repositorios de vehículos y tareas se resuelven por el
    /// tenant del usuario autenticado.
    pub fn new(pool: PgPool, user: &AuthUser) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone(), user.tenant_type),
            regions: RegionRepository::new(pool.clone()),
            commissioning: CommissioningService::new(
                TaskTemplateRepository::new(pool.clone()),
                VehicleTaskRepository::new(pool, user.tenant_type),
            ),
        }
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        require_edit_vehicles(user)?;
        request.validate()?;

        let vin = validate_vin(&request.vin).map_err(|e| field_error("vin", e))?;
        validate_year(request.year).map_err(|e| field_error("year", e))?;

        let vehicle_type = VehicleType::parse_str(&request.vehicle_type)
            .ok_or_else(|| bad_request_error("Invalid vehicle type"))?;

        let status = match &request.status {
            Some(value) => VehicleStatus::parse_str(value)
                .ok_or_else(|| bad_request_error("Invalid vehicle status"))?,
            None => VehicleStatus::Draft,
        };

        if self.vehicles.vehicle_id_exists(&request.vehicle_id).await? {
            return Err(conflict_error("Vehicle", "vehicle_id", &request.vehicle_id));
        }

        let record = NewVehicle {
            vehicle_id: request.vehicle_id,
            vin,
            plate: request.plate,
            make: request.make,
            model: request.model,
            year: request.year,
            vehicle_type,
            status,
            region_id: request.region_id,
            commissioning_template: request.commissioning_template,
            odometer: request.odometer.unwrap_or(0),
            fuel_type: request.fuel_type,
            in_service_date: request.in_service_date,
            primary_depot: request.primary_depot,
            radio_id: request.radio_id,
            lytx_id: request.lytx_id,
            last_chp_inspection: request.last_chp_inspection,
            next_chp_inspection: request.next_chp_inspection,
        };

        let vehicle = self.vehicles.create(&record).await?;

        // Un vehículo que nace en Commissioning recibe su checklist
        if status == VehicleStatus::Commissioning {
            self.commissioning.materialize_tasks(&vehicle).await?;
        }

        let response = self.to_response(vehicle).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Vehículo registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        self.to_response(vehicle).await
    }

    pub async fn list(&self, filters: VehicleFilters) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.vehicles.list(&filters).await?;

        let mut responses = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            responses.push(self.to_response(vehicle).await?);
        }

        Ok(responses)
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        require_edit_vehicles(user)?;
        request.validate()?;

        let mut vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if let Some(year) = request.year {
            validate_year(year).map_err(|e| field_error("year", e))?;
            vehicle.year = year;
        }
        if let Some(vehicle_type) = &request.vehicle_type {
            VehicleType::parse_str(vehicle_type)
                .ok_or_else(|| bad_request_error("Invalid vehicle type"))?;
            vehicle.vehicle_type = vehicle_type.clone();
        }

        let previous_status = vehicle.status.clone();
        if let Some(status) = &request.status {
            VehicleStatus::parse_str(status)
                .ok_or_else(|| bad_request_error("Invalid vehicle status"))?;
            vehicle.status = status.clone();
        }

        if request.plate.is_some() {
            vehicle.plate = request.plate;
        }
        if let Some(make) = request.make {
            vehicle.make = make;
        }
        if let Some(model) = request.model {
            vehicle.model = model;
        }
        if request.region_id.is_some() {
            vehicle.region_id = request.region_id;
        }
        if let Some(odometer) = request.odometer {
            vehicle.odometer = odometer;
        }
        if request.fuel_type.is_some() {
            vehicle.fuel_type = request.fuel_type;
        }
        if request.in_service_date.is_some() {
            vehicle.in_service_date = request.in_service_date;
        }
        if request.primary_depot.is_some() {
            vehicle.primary_depot = request.primary_depot;
        }
        if request.last_chp_inspection.is_some() {
            vehicle.last_chp_inspection = request.last_chp_inspection;
        }
        if request.next_chp_inspection.is_some() {
            vehicle.next_chp_inspection = request.next_chp_inspection;
        }

        let updated = self.vehicles.update(&vehicle).await?;

        // Entrar a Commissioning materializa el checklist una sola vez
        if previous_status != "Commissioning" && updated.status == "Commissioning" {
            self.commissioning.materialize_tasks(&updated).await?;
        }

        let response = self.to_response(updated).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn update_status(
        &self,
        user: &AuthUser,
        id: Uuid,
        status: &str,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        require_edit_vehicles(user)?;

        VehicleStatus::parse_str(status)
            .ok_or_else(|| bad_request_error("Invalid vehicle status"))?;

        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let previous_status = vehicle.status.clone();
        let updated = self.vehicles.update_status(id, status).await?;

        if previous_status != "Commissioning" && updated.status == "Commissioning" {
            self.commissioning.materialize_tasks(&updated).await?;
        }

        let response = self.to_response(updated).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Estado del vehículo actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        require_admin(user)?;

        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        self.vehicles.delete(id).await
    }

    async fn to_response(&self, vehicle: Vehicle) -> AppResult<VehicleResponse> {
        let region = match vehicle.region_id {
            Some(region_id) => self.regions.find_by_id(region_id).await?,
            None => None,
        };

        Ok(VehicleResponse::from_vehicle(vehicle, region))
    }
}
