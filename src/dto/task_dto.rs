//! DTOs del workflow de comisionado

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::task::VehicleTask;

/// Request para cambiar el estado de una tarea
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskStatusRequest {
    pub status: String,

    #[validate(range(min = 0, max = 100))]
    pub percent_complete: Option<i32>,

    #[validate(length(max = 500))]
    pub evidence_url: Option<String>,
}

/// Request para asignar una tarea
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    pub assignee_id: Option<Uuid>,
}

/// Request para crear un paso de template
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 50))]
    pub template_id: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub region_id: Option<Uuid>,

    pub vehicle_type: String,

    #[validate(range(min = 1))]
    pub step_order: i32,

    #[validate(length(min = 1, max = 200))]
    pub step_name: String,

    pub step_category: String,

    #[validate(range(min = 1))]
    pub sla_hours: i32,

    pub requires_evidence: bool,
    pub requires_approval: bool,

    #[validate(length(max = 100))]
    pub evidence_type: Option<String>,

    #[validate(length(max = 50))]
    pub dependent_step_id: Option<String>,
}

/// Response de tarea con el flag de SLA calculado
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub template_id: Option<Uuid>,
    pub step_name: String,
    pub step_category: String,
    pub status: String,
    pub percent_complete: i32,
    pub assignee_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub evidence_url: Option<String>,
    pub requires_evidence: bool,
    pub requires_approval: bool,
    pub sla_hours: i32,
    pub dependent_step_id: Option<String>,
    pub sla_breached: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn from_task(task: VehicleTask, now: DateTime<Utc>) -> Self {
        let sla_breached = task.is_sla_breached(now);
        Self {
            id: task.id,
            vehicle_id: task.vehicle_id,
            template_id: task.template_id,
            step_name: task.step_name,
            step_category: task.step_category,
            status: task.status,
            percent_complete: task.percent_complete,
            assignee_id: task.assignee_id,
            approved_by: task.approved_by,
            due_date: task.due_date,
            evidence_url: task.evidence_url,
            requires_evidence: task.requires_evidence,
            requires_approval: task.requires_approval,
            sla_hours: task.sla_hours,
            dependent_step_id: task.dependent_step_id,
            sla_breached,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
