//! Controller del workflow de tareas
//!
//! Toda transición de estado pasa por el servicio de comisionado, que
//! aplica la máquina de estados y sus guardas también acá, no solo en
//! la UI.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::task_dto::{
    AssignTaskRequest, CreateTemplateRequest, TaskResponse, UpdateTaskStatusRequest,
};
use crate::models::auth::AuthUser;
use crate::models::task::{NewTaskTemplate, TaskCategory, TaskStatus, TaskTemplate};
use crate::models::vehicle::VehicleType;
use crate::repositories::task_template_repository::TaskTemplateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::vehicle_task_repository::VehicleTaskRepository;
use crate::services::authorization_service::{require_admin, require_approver, require_edit_vehicles};
use crate::services::commissioning_service::{
    is_dependency_satisfied, CommissioningService, TransitionRequest,
};
use crate::utils::errors::{bad_request_error, AppError, AppResult};

pub struct TaskController {
    tasks: VehicleTaskRepository,
    templates: TaskTemplateRepository,
    vehicles: VehicleRepository,
    commissioning: CommissioningService,
}

impl TaskController {
    pub fn new(pool: PgPool, user: &AuthUser) -> Self {
        Self {
            tasks: VehicleTaskRepository::new(pool.clone(), user.tenant_type),
            templates: TaskTemplateRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone(), user.tenant_type),
            commissioning: CommissioningService::new(
                TaskTemplateRepository::new(pool.clone()),
                VehicleTaskRepository::new(pool, user.tenant_type),
            ),
        }
    }

    /// Checklist de un vehículo con el flag de SLA calculado
    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<TaskResponse>> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let tasks = self.tasks.find_by_vehicle(vehicle_id).await?;
        let now = Utc::now();

        Ok(tasks
            .into_iter()
            .map(|task| TaskResponse::from_task(task, now))
            .collect())
    }

    /// Cambiar el estado de una tarea
    ///
    /// Aprobar exige rol aprobador y registra al usuario como approver;
    /// el resto de transiciones exige rol editor.
    pub async fn update_status(
        &self,
        user: &AuthUser,
        task_id: Uuid,
        request: UpdateTaskStatusRequest,
    ) -> AppResult<ApiResponse<TaskResponse>> {
        request.validate()?;

        let to = TaskStatus::parse_str(&request.status)
            .ok_or_else(|| bad_request_error("Invalid task status"))?;

        let approver = match to {
            TaskStatus::Approved | TaskStatus::Rejected => {
                require_approver(user)?;
                Some(user.id)
            }
            _ => {
                require_edit_vehicles(user)?;
                None
            }
        };

        let transition = TransitionRequest {
            to,
            evidence_url: request.evidence_url,
            approver,
        };

        let updated = self
            .commissioning
            .apply_transition(task_id, transition, request.percent_complete)
            .await?;

        Ok(ApiResponse::success_with_message(
            TaskResponse::from_task(updated, Utc::now()),
            "Estado de la tarea actualizado".to_string(),
        ))
    }

    pub async fn assign(
        &self,
        user: &AuthUser,
        task_id: Uuid,
        request: AssignTaskRequest,
    ) -> AppResult<ApiResponse<TaskResponse>> {
        require_edit_vehicles(user)?;

        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        let updated = self.tasks.assign(task_id, request.assignee_id).await?;

        Ok(ApiResponse::success_with_message(
            TaskResponse::from_task(updated, Utc::now()),
            "Tarea asignada".to_string(),
        ))
    }

    /// ¿Puede arrancar esta tarea? Expone el estado del predecesor
    /// para que la UI muestre el bloqueo.
    pub async fn dependency_state(&self, task_id: Uuid) -> AppResult<bool> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        let siblings = self.tasks.find_by_vehicle(task.vehicle_id).await?;
        Ok(is_dependency_satisfied(&task, &siblings))
    }

    pub async fn list_templates(&self) -> AppResult<Vec<TaskTemplate>> {
        self.templates.list().await
    }

    /// Alta manual de un paso de template (solo admin)
    pub async fn create_template(
        &self,
        user: &AuthUser,
        request: CreateTemplateRequest,
    ) -> AppResult<ApiResponse<TaskTemplate>> {
        require_admin(user)?;
        request.validate()?;

        let vehicle_type = VehicleType::parse_str(&request.vehicle_type)
            .ok_or_else(|| bad_request_error("Invalid vehicle type"))?;
        let step_category = TaskCategory::parse_str(&request.step_category)
            .ok_or_else(|| bad_request_error("Invalid task category"))?;

        let record = NewTaskTemplate {
            template_id: request.template_id,
            name: request.name,
            region_id: request.region_id,
            vehicle_type,
            step_order: request.step_order,
            step_name: request.step_name,
            step_category,
            sla_hours: request.sla_hours,
            requires_evidence: request.requires_evidence,
            requires_approval: request.requires_approval,
            evidence_type: request.evidence_type,
            dependent_step_id: request.dependent_step_id,
        };

        let template = self.templates.create(&record).await?;

        Ok(ApiResponse::success_with_message(
            template,
            "Paso de template creado".to_string(),
        ))
    }
}
