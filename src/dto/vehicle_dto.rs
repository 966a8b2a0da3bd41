//! DTOs de Vehicle
//!
//! Requests de alta/edición (validadas con validator + las reglas de
//! dominio de utils::validation) y responses con la región resuelta.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::region::Region;
use crate::models::vehicle::Vehicle;

/// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub vehicle_id: String,

    // VIN validado aparte (17 caracteres, alfabeto restringido)
    pub vin: String,

    #[validate(length(max = 20))]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    pub year: i32,

    pub vehicle_type: String,

    pub status: Option<String>,

    pub region_id: Option<Uuid>,

    #[validate(length(max = 100))]
    pub commissioning_template: Option<String>,

    pub odometer: Option<i32>,

    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,

    pub in_service_date: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub primary_depot: Option<String>,

    #[validate(length(max = 50))]
    pub radio_id: Option<String>,

    #[validate(length(max = 50))]
    pub lytx_id: Option<String>,

    pub last_chp_inspection: Option<NaiveDate>,
    pub next_chp_inspection: Option<NaiveDate>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(max = 20))]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    pub year: Option<i32>,

    pub vehicle_type: Option<String>,

    pub status: Option<String>,

    pub region_id: Option<Uuid>,

    pub odometer: Option<i32>,

    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,

    pub in_service_date: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub primary_depot: Option<String>,

    pub last_chp_inspection: Option<NaiveDate>,
    pub next_chp_inspection: Option<NaiveDate>,
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<String>,
    pub vehicle_type: Option<String>,
    pub region_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vehicle_id: String,
    pub vin: String,
    pub plate: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub status: String,
    pub region: Option<Region>,
    pub commissioning_template: Option<String>,
    pub odometer: i32,
    pub fuel_type: Option<String>,
    pub in_service_date: Option<NaiveDate>,
    pub primary_depot: Option<String>,
    pub radio_id: Option<String>,
    pub lytx_id: Option<String>,
    pub last_chp_inspection: Option<NaiveDate>,
    pub next_chp_inspection: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, region: Option<Region>) -> Self {
        Self {
            id: vehicle.id,
            vehicle_id: vehicle.vehicle_id,
            vin: vehicle.vin,
            plate: vehicle.plate,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type,
            status: vehicle.status,
            region,
            commissioning_template: vehicle.commissioning_template,
            odometer: vehicle.odometer,
            fuel_type: vehicle.fuel_type,
            in_service_date: vehicle.in_service_date,
            primary_depot: vehicle.primary_depot,
            radio_id: vehicle.radio_id,
            lytx_id: vehicle.lytx_id,
            last_chp_inspection: vehicle.last_chp_inspection,
            next_chp_inspection: vehicle.next_chp_inspection,
            created_at: vehicle.created_at,
        }
    }
}
