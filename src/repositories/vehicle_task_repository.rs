//! Repositorio de tareas de comisionado por vehículo
//!
//! Tabla resuelta por tenant (vehicle_tasks / demo_vehicle_tasks).

use crate::models::auth::TenantType;
use crate::models::task::VehicleTask;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Campos de una tarea a materializar desde un template
#[derive(Debug, Clone)]
pub struct NewVehicleTask {
    pub vehicle_id: Uuid,
    pub template_id: Option<Uuid>,
    pub step_name: String,
    pub step_category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub requires_evidence: bool,
    pub requires_approval: bool,
    pub sla_hours: i32,
    pub dependent_step_id: Option<String>,
}

pub struct VehicleTaskRepository {
    pool: PgPool,
    table: String,
}

impl VehicleTaskRepository {
    pub fn new(pool: PgPool, tenant: TenantType) -> Self {
        Self {
            pool,
            table: tenant.table("vehicle_tasks"),
        }
    }

    /// Materializar el checklist completo de un vehículo en un solo INSERT
    pub async fn create_many(&self, tasks: &[NewVehicleTask]) -> Result<u64, AppError> {
        if tasks.is_empty() {
            return Ok(0);
        }

        let sql_prefix = format!(
            "INSERT INTO {} (id, vehicle_id, template_id, step_name, step_category, status, \
             percent_complete, due_date, requires_evidence, requires_approval, sla_hours, \
             dependent_step_id, created_at, updated_at) ",
            self.table
        );

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(sql_prefix);
        let now = Utc::now();

        builder.push_values(tasks, |mut b, task| {
            b.push_bind(Uuid::new_v4())
                .push_bind(task.vehicle_id)
                .push_bind(task.template_id)
                .push_bind(&task.step_name)
                .push_bind(&task.step_category)
                .push_bind("Not Started")
                .push_bind(0_i32)
                .push_bind(task.due_date)
                .push_bind(task.requires_evidence)
                .push_bind(task.requires_approval)
                .push_bind(task.sla_hours)
                .push_bind(&task.dependent_step_id)
                .push_bind(now)
                .push_bind(now);
        });

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Insertar una tarea suelta con estado explícito (seeding demo)
    pub async fn create_with_status(
        &self,
        task: &NewVehicleTask,
        status: &str,
        percent_complete: i32,
    ) -> Result<VehicleTask, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, vehicle_id, template_id, step_name, step_category, status,
                            percent_complete, due_date, requires_evidence, requires_approval,
                            sla_hours, dependent_step_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING *
            "#,
            self.table
        );

        let created = sqlx::query_as::<_, VehicleTask>(&sql)
            .bind(Uuid::new_v4())
            .bind(task.vehicle_id)
            .bind(task.template_id)
            .bind(&task.step_name)
            .bind(&task.step_category)
            .bind(status)
            .bind(percent_complete)
            .bind(task.due_date)
            .bind(task.requires_evidence)
            .bind(task.requires_approval)
            .bind(task.sla_hours)
            .bind(&task.dependent_step_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleTask>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.table);
        let task = sqlx::query_as::<_, VehicleTask>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleTask>, AppError> {
        let sql = format!(
            "SELECT * FROM {} WHERE vehicle_id = $1 ORDER BY created_at",
            self.table
        );
        let tasks = sqlx::query_as::<_, VehicleTask>(&sql)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    pub async fn has_tasks(&self, vehicle_id: Uuid) -> Result<bool, AppError> {
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

    /// Persistir una transición ya validada por la capa de servicios
    pub async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        percent_complete: i32,
        evidence_url: Option<&str>,
        approved_by: Option<Uuid>,
    ) -> Result<VehicleTask, AppError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $2,
                percent_complete = $3,
                evidence_url = COALESCE($4, evidence_url),
                approved_by = COALESCE($5, approved_by),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
            self.table
        );

        let task = sqlx::query_as::<_, VehicleTask>(&sql)
            .bind(id)
            .bind(status)
            .bind(percent_complete)
            .bind(evidence_url)
            .bind(approved_by)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn assign(&self, id: Uuid, assignee_id: Option<Uuid>) -> Result<VehicleTask, AppError> {
        let sql = format!(
            "UPDATE {} SET assignee_id = $2, updated_at = $3 WHERE id = $1 RETURNING *",
            self.table
        );
        let task = sqlx::query_as::<_, VehicleTask>(&sql)
            .bind(id)
            .bind(assignee_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }
}
