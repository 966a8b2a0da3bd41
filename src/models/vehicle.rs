//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus enums de tipo y estado
//! y sus variantes para CRUD operations. Los estados se persisten como
//! texto y se tipan en la capa de servicios.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de unidad - mapea al ENUM vehicle_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "ALS")]
    Als,
    #[serde(rename = "BLS")]
    Bls,
    #[serde(rename = "CCT")]
    Cct,
    Supervisor,
    Other,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Als => "ALS",
            VehicleType::Bls => "BLS",
            VehicleType::Cct => "CCT",
            VehicleType::Supervisor => "Supervisor",
            VehicleType::Other => "Other",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "ALS" => Some(VehicleType::Als),
            "BLS" => Some(VehicleType::Bls),
            "CCT" => Some(VehicleType::Cct),
            "Supervisor" => Some(VehicleType::Supervisor),
            "Other" => Some(VehicleType::Other),
            _ => None,
        }
    }
}

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Draft,
    Commissioning,
    Ready,
    #[serde(rename = "Out-of-Service")]
    OutOfService,
    Decommissioned,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Draft => "Draft",
            VehicleStatus::Commissioning => "Commissioning",
            VehicleStatus::Ready => "Ready",
            VehicleStatus::OutOfService => "Out-of-Service",
            VehicleStatus::Decommissioned => "Decommissioned",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Draft" => Some(VehicleStatus::Draft),
            "Commissioning" => Some(VehicleStatus::Commissioning),
            "Ready" => Some(VehicleStatus::Ready),
            "Out-of-Service" => Some(VehicleStatus::OutOfService),
            "Decommissioned" => Some(VehicleStatus::Decommissioned),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea a la tabla vehicles (o demo_vehicles)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_id: String,
    pub vin: String,
    pub plate: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub status: String,
    pub region_id: Option<Uuid>,
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

/// Registro validado listo para insertar, producido por el
/// formulario de alta o por el pipeline de import CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub vehicle_id: String,
    pub vin: String,
    pub plate: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub region_id: Option<Uuid>,
    pub commissioning_template: Option<String>,
    pub odometer: i32,
    pub fuel_type: Option<String>,
    pub in_service_date: Option<NaiveDate>,
    pub primary_depot: Option<String>,
    pub radio_id: Option<String>,
    pub lytx_id: Option<String>,
    pub last_chp_inspection: Option<NaiveDate>,
    pub next_chp_inspection: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_round_trip() {
        for t in ["ALS", "BLS", "CCT", "Supervisor", "Other"] {
            assert_eq!(VehicleType::parse_str(t).unwrap().as_str(), t);
        }
        assert!(VehicleType::parse_str("Ambulance").is_none());
    }

    #[test]
    fn test_vehicle_status_round_trip() {
        for s in ["Draft", "Commissioning", "Ready", "Out-of-Service", "Decommissioned"] {
            assert_eq!(VehicleStatus::parse_str(s).unwrap().as_str(), s);
        }
        assert!(VehicleStatus::parse_str("Active").is_none());
    }
}
