//! Repositorio de task templates
//!
//! Los templates son datos de referencia del tenant interno; el tenant
//! demo recibe tareas sembradas directamente, sin templates propios.

use crate::models::task::{NewTaskTemplate, TaskTemplate};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

pub struct TaskTemplateRepository {
    pool: PgPool,
}

impl TaskTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, record: &NewTaskTemplate) -> Result<TaskTemplate, AppError> {
        let template = sqlx::query_as::<_, TaskTemplate>(
            r#"
            INSERT INTO task_templates (id, template_id, name, region_id, vehicle_type, step_order,
                                        step_name, step_category, sla_hours, requires_evidence,
                                        requires_approval, evidence_type, dependent_step_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.template_id)
        .bind(&record.name)
        .bind(record.region_id)
        .bind(record.vehicle_type.as_str())
        .bind(record.step_order)
        .bind(&record.step_name)
        .bind(record.step_category.as_str())
        .bind(record.sla_hours)
        .bind(record.requires_evidence)
        .bind(record.requires_approval)
        .bind(&record.evidence_type)
        .bind(&record.dependent_step_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    /// Insertar un batch del import como un solo INSERT multi-fila
    pub async fn insert_batch(&self, records: &[NewTaskTemplate]) -> Result<u64, AppError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO task_templates (id, template_id, name, region_id, vehicle_type, step_order, \
             step_name, step_category, sla_hours, requires_evidence, requires_approval, \
             evidence_type, dependent_step_id, created_at) ",
        );
        let now = Utc::now();

        builder.push_values(records, |mut b, record| {
            b.push_bind(Uuid::new_v4())
                .push_bind(&record.template_id)
                .push_bind(&record.name)
                .push_bind(record.region_id)
                .push_bind(record.vehicle_type.as_str())
                .push_bind(record.step_order)
                .push_bind(&record.step_name)
                .push_bind(record.step_category.as_str())
                .push_bind(record.sla_hours)
                .push_bind(record.requires_evidence)
                .push_bind(record.requires_approval)
                .push_bind(&record.evidence_type)
                .push_bind(&record.dependent_step_id)
                .push_bind(now);
        });

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    pub async fn list(&self) -> Result<Vec<TaskTemplate>, AppError> {
        let templates = sqlx::query_as::<_, TaskTemplate>(
            "SELECT * FROM task_templates ORDER BY template_id, step_order",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    /// Checklist aplicable a un vehículo: mismo tipo, y región igual
    /// o template sin región, en orden de paso.
    pub async fn find_for_vehicle(
        &self,
        vehicle_type: &str,
        region_id: Option<Uuid>,
    ) -> Result<Vec<TaskTemplate>, AppError> {
        let templates = sqlx::query_as::<_, TaskTemplate>(
            r#"
            SELECT * FROM task_templates
            WHERE vehicle_type = $1
              AND (region_id IS NULL OR region_id = $2)
            ORDER BY step_order
            "#,
        )
        .bind(vehicle_type)
        .bind(region_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }
}
