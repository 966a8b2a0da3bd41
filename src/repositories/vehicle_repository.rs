//! Repositorio de vehículos
//!
//! Todas las queries usan el nombre de tabla resuelto por tenant:
//! el tenant demo opera sobre demo_vehicles. Por eso se usa la API
//! dinámica de sqlx en lugar de los macros con chequeo en compilación.

use crate::dto::vehicle_dto::VehicleFilters;
use crate::models::auth::TenantType;
use crate::models::vehicle::{NewVehicle, Vehicle};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
    table: String,
}

impl VehicleRepository {
    pub fn new(pool: PgPool, tenant: TenantType) -> Self {
        Self {
            pool,
            table: tenant.table("vehicles"),
        }
    }

    pub async fn create(&self, record: &NewVehicle) -> Result<Vehicle, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, vehicle_id, vin, plate, make, model, year, vehicle_type, status,
                            region_id, commissioning_template, odometer, fuel_type, in_service_date,
                            primary_depot, radio_id, lytx_id, last_chp_inspection, next_chp_inspection, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
            self.table
        );

        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(Uuid::new_v4())
            .bind(&record.vehicle_id)
            .bind(&record.vin)
            .bind(&record.plate)
            .bind(&record.make)
            .bind(&record.model)
            .bind(record.year)
            .bind(record.vehicle_type.as_str())
            .bind(record.status.as_str())
            .bind(record.region_id)
            .bind(&record.commissioning_template)
            .bind(record.odometer)
            .bind(&record.fuel_type)
            .bind(record.in_service_date)
            .bind(&record.primary_depot)
            .bind(&record.radio_id)
            .bind(&record.lytx_id)
            .bind(record.last_chp_inspection)
            .bind(record.next_chp_inspection)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Insertar un batch completo como un solo INSERT multi-fila.
    /// Si el batch falla, falla entero: el import lo reporta como
    /// un único error sin fallback por fila.
    pub async fn insert_batch(&self, records: &[NewVehicle]) -> Result<u64, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql_prefix = format!(
            "INSERT INTO {} (id, vehicle_id, vin, plate, make, model, year, vehicle_type, status, \
             region_id, commissioning_template, odometer, fuel_type, in_service_date, \
             primary_depot, radio_id, lytx_id, last_chp_inspection, next_chp_inspection, created_at) ",
            self.table
        );

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(sql_prefix);
        let now = Utc::now();

        builder.push_values(records, |mut b, record| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&record.vehicle_id)
                .push_bind(&record.vin)
                .push_bind(&record.plate)
                .push_bind(&record.make)
                .push_bind(&record.model)
                .push_bind(record.year)
                .push_bind(record.vehicle_type.as_str())
                .push_bind(record.status.as_str())
                .push_bind(record.region_id)
                .push_bind(&record.commissioning_template)
                .push_bind(record.odometer)
                .push_bind(&record.fuel_type)
                .push_bind(record.in_service_date)
                .push_bind(&record.primary_depot)
                .push_bind(&record.radio_id)
                .push_bind(&record.lytx_id)
                .push_bind(record.last_chp_inspection)
                .push_bind(record.next_chp_inspection)
                .push_bind(now);
        });

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.table);
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Buscar por el código legible (vehicle_id), único por tabla
    pub async fn find_by_vehicle_id(&self, vehicle_id: &str) -> Result<Option<Vehicle>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE vehicle_id = $1", self.table);
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn vehicle_id_exists(&self, vehicle_id: &str) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE vehicle_id = $1)",
            self.table
        );
        let result: (bool,) = sqlx::query_as(&sql)
            .bind(vehicle_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT * FROM {} WHERE 1=1", self.table));

        if let Some(status) = &filters.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(vehicle_type) = &filters.vehicle_type {
            builder.push(" AND vehicle_type = ").push_bind(vehicle_type);
        }
        if let Some(region_id) = filters.region_id {
            builder.push(" AND region_id = ").push_bind(region_id);
        }

        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(filters.limit.unwrap_or(100));
        builder.push(" OFFSET ").push_bind(filters.offset.unwrap_or(0));

        let vehicles = builder.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;

        Ok(vehicles)
    }

    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET plate = $2, make = $3, model = $4, year = $5, vehicle_type = $6, status = $7,
                region_id = $8, odometer = $9, fuel_type = $10, in_service_date = $11,
                primary_depot = $12, last_chp_inspection = $13, next_chp_inspection = $14
            WHERE id = $1
            RETURNING *
            "#,
            self.table
        );

        let updated = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(vehicle.id)
            .bind(&vehicle.plate)
            .bind(&vehicle.make)
            .bind(&vehicle.model)
            .bind(vehicle.year)
            .bind(&vehicle.vehicle_type)
            .bind(&vehicle.status)
            .bind(vehicle.region_id)
            .bind(vehicle.odometer)
            .bind(&vehicle.fuel_type)
            .bind(vehicle.in_service_date)
            .bind(&vehicle.primary_depot)
            .bind(vehicle.last_chp_inspection)
            .bind(vehicle.next_chp_inspection)
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Vehicle, AppError> {
        let sql = format!(
            "UPDATE {} SET status = $2 WHERE id = $1 RETURNING *",
            self.table
        );
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(())
    }
}
