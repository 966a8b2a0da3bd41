//! Repositorio de inspecciones

use crate::models::inspection::Inspection;
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_id: Uuid,
        inspection_type: &str,
        scheduled_date: NaiveDate,
        inspector: Option<&str>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>(
            r#"
            INSERT INTO inspections (id, vehicle_id, inspection_type, scheduled_date, result, inspector, notes, created_at)
            VALUES ($1, $2, $3, $4, 'Pending', $5, NULL, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(inspection_type)
        .bind(scheduled_date)
        .bind(inspector)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inspection)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>("SELECT * FROM inspections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(inspection)
    }

    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let inspections = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE vehicle_id = $1 ORDER BY scheduled_date DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inspections)
    }

    pub async fn record_result(
        &self,
        id: Uuid,
        result: &str,
        notes: Option<&str>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>(
            "UPDATE inspections SET result = $2, notes = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(result)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(inspection)
    }
}
