//! Seeding de datos demo
//!
//! Siembra la flota de muestra para un usuario del tenant demo: tres
//! vehículos en estados distintos y un checklist de tres tareas sobre el
//! que está en Commissioning. Rechaza usuarios que no sean demo.

use chrono::{Duration, Utc};

use crate::models::auth::TenantType;
use crate::models::vehicle::{NewVehicle, VehicleStatus, VehicleType};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::vehicle_task_repository::{NewVehicleTask, VehicleTaskRepository};
use crate::utils::errors::{AppError, AppResult};
use uuid::Uuid;

/// Resumen del seeding
#[derive(Debug, serde::Serialize)]
pub struct SeedSummary {
    pub vehicles: usize,
    pub tasks: usize,
}

pub struct SeedService {
    users: UserRepository,
    vehicles: VehicleRepository,
    tasks: VehicleTaskRepository,
}

impl SeedService {
    /// Los repositorios deben venir construidos para el tenant demo
    pub fn new(
        users: UserRepository,
        vehicles: VehicleRepository,
        tasks: VehicleTaskRepository,
    ) -> Self {
        Self {
            users,
            vehicles,
            tasks,
        }
    }

    pub async fn seed_demo_data(&self, user_id: Uuid) -> AppResult<SeedSummary> {
        let profile = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if TenantType::parse_str(&profile.tenant_type) != Some(TenantType::Demo) {
            return Err(AppError::Forbidden("User is not a demo user".to_string()));
        }

        log::info!("🌱 Sembrando datos demo para {}", profile.email);

        let demo_vehicles = demo_fleet();
        let mut created = Vec::with_capacity(demo_vehicles.len());
        for record in &demo_vehicles {
            created.push(self.vehicles.create(record).await?);
        }

        // Checklist de muestra sobre el vehículo en Commissioning
        let mut task_count = 0usize;
        if let Some(commissioning) = created.iter().find(|v| v.status == "Commissioning") {
            for (step_name, category, status, percent, sla_hours) in [
                ("Initial Inspection", "Safety", "Approved", 100, 24),
                ("Equipment Installation", "Logistics", "In Progress", 60, 48),
                ("Final Testing", "Compliance", "Not Started", 0, 24),
            ] {
                let task = NewVehicleTask {
                    vehicle_id: commissioning.id,
                    template_id: None,
                    step_name: step_name.to_string(),
                    step_category: category.to_string(),
                    due_date: Some(Utc::now() + Duration::hours(sla_hours as i64)),
                    requires_evidence: true,
                    requires_approval: status != "Approved",
                    sla_hours,
                    dependent_step_id: None,
                };
                self.tasks.create_with_status(&task, status, percent).await?;
                task_count += 1;
            }
        }

        log::info!(
            "✅ Demo sembrada: {} vehículos, {} tareas",
            created.len(),
            task_count
        );

        Ok(SeedSummary {
            vehicles: created.len(),
            tasks: task_count,
        })
    }
}

fn demo_fleet() -> Vec<NewVehicle> {
    vec![
        NewVehicle {
            vehicle_id: "DEMO-001".to_string(),
            vin: "DEM017CHARV1N0001".to_string(),
            plate: Some("DEMO001".to_string()),
            make: "Ford".to_string(),
            model: "E-450".to_string(),
            year: 2023,
            vehicle_type: VehicleType::Als,
            status: VehicleStatus::Ready,
            region_id: None,
            commissioning_template: None,
            odometer: 12500,
            fuel_type: Some("Diesel".to_string()),
            in_service_date: None,
            primary_depot: Some("Demo Depot".to_string()),
            radio_id: None,
            lytx_id: None,
            last_chp_inspection: None,
            next_chp_inspection: None,
        },
        NewVehicle {
            vehicle_id: "DEMO-002".to_string(),
            vin: "DEM017CHARV1N0002".to_string(),
            plate: Some("DEMO002".to_string()),
            make: "Mercedes".to_string(),
            model: "Sprinter".to_string(),
            year: 2024,
            vehicle_type: VehicleType::Bls,
            status: VehicleStatus::Commissioning,
            region_id: None,
            commissioning_template: None,
            odometer: 150,
            fuel_type: Some("Diesel".to_string()),
            in_service_date: None,
            primary_depot: Some("Demo Depot".to_string()),
            radio_id: None,
            lytx_id: None,
            last_chp_inspection: None,
            next_chp_inspection: None,
        },
        NewVehicle {
            vehicle_id: "DEMO-003".to_string(),
            vin: "DEM017CHARV1N0003".to_string(),
            plate: Some("DEMO003".to_string()),
            make: "Chevrolet".to_string(),
            model: "Express".to_string(),
            year: 2023,
            vehicle_type: VehicleType::Cct,
            status: VehicleStatus::Draft,
            region_id: None,
            commissioning_template: None,
            odometer: 0,
            fuel_type: Some("Gas".to_string()),
            in_service_date: None,
            primary_depot: Some("Demo Depot".to_string()),
            radio_id: None,
            lytx_id: None,
            last_chp_inspection: None,
            next_chp_inspection: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate_vin;

    #[test]
    fn test_demo_fleet_is_valid() {
        let fleet = demo_fleet();
        assert_eq!(fleet.len(), 3);
        // Los VIN demo respetan el alfabeto real
        for vehicle in &fleet {
            assert!(validate_vin(&vehicle.vin).is_ok(), "VIN inválido: {}", vehicle.vin);
        }
        assert!(fleet.iter().any(|v| v.status == VehicleStatus::Commissioning));
    }
}
