//! Workflow de comisionado
//!
//! Materializa el checklist de templates cuando un vehículo entra en
//! Commissioning y aplica la máquina de estados de tareas de forma
//! central: ningún write path cambia un status sin pasar por
//! `validate_transition`.

use chrono::{DateTime, Duration, Utc};

use crate::models::task::{TaskStatus, TaskTemplate, VehicleTask};
use crate::models::vehicle::Vehicle;
use crate::repositories::task_template_repository::TaskTemplateRepository;
use crate::repositories::vehicle_task_repository::{NewVehicleTask, VehicleTaskRepository};
use crate::utils::errors::{AppError, AppResult};
use uuid::Uuid;

/// Cambio de estado solicitado sobre una tarea
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub to: TaskStatus,
    pub evidence_url: Option<String>,
    pub approver: Option<Uuid>,
}

/// Validar una transición contra la máquina de estados y sus guardas.
///
/// Reglas: solo transiciones legales; Submitted exige evidencia cuando
/// el paso la requiere; Approved exige un aprobador cuando el paso
/// requiere aprobación.
pub fn validate_transition(task: &VehicleTask, request: &TransitionRequest) -> Result<(), String> {
    let from = TaskStatus::parse_str(&task.status)
        .ok_or_else(|| format!("Task has an unknown status '{}'", task.status))?;

    if !TaskStatus::can_transition(from, request.to) {
        return Err(format!(
            "Illegal transition from '{}' to '{}'",
            from.as_str(),
            request.to.as_str()
        ));
    }

    if request.to == TaskStatus::Submitted && task.requires_evidence {
        let has_evidence =
            request.evidence_url.is_some() || task.evidence_url.is_some();
        if !has_evidence {
            return Err("Task requires evidence before it can be submitted".to_string());
        }
    }

    if request.to == TaskStatus::Approved && task.requires_approval && request.approver.is_none() {
        return Err("Task requires an approver to be approved".to_string());
    }

    Ok(())
}

/// Porcentaje implícito de un estado cuando el caller no manda uno
pub fn default_percent_for(status: TaskStatus, current: i32) -> i32 {
    match status {
        TaskStatus::NotStarted => 0,
        TaskStatus::Approved => 100,
        _ => current,
    }
}

/// ¿Está satisfecho el predecesor de esta tarea?
///
/// El dependent_step_id referencia el step_name del paso predecesor
/// dentro del mismo checklist; sin predecesor siempre es true.
pub fn is_dependency_satisfied(task: &VehicleTask, siblings: &[VehicleTask]) -> bool {
    match &task.dependent_step_id {
        None => true,
        Some(dependent) => siblings
            .iter()
            .filter(|s| s.id != task.id && &s.step_name == dependent)
            .all(|s| {
                TaskStatus::parse_str(&s.status)
                    .map(|status| status == TaskStatus::Approved)
                    .unwrap_or(false)
            }),
    }
}

/// Construir las tareas a materializar para un vehículo a partir de su
/// checklist de templates, en orden de paso. Puro: la persistencia la
/// hace el repositorio.
pub fn build_tasks_from_templates(
    vehicle: &Vehicle,
    templates: &[TaskTemplate],
    now: DateTime<Utc>,
) -> Vec<NewVehicleTask> {
    templates
        .iter()
        .map(|template| NewVehicleTask {
            vehicle_id: vehicle.id,
            template_id: Some(template.id),
            step_name: template.step_name.clone(),
            step_category: template.step_category.clone(),
            due_date: Some(now + Duration::hours(template.sla_hours as i64)),
            requires_evidence: template.requires_evidence,
            requires_approval: template.requires_approval,
            sla_hours: template.sla_hours,
            dependent_step_id: template.dependent_step_id.clone(),
        })
        .collect()
}

/// Servicio de comisionado
pub struct CommissioningService {
    templates: TaskTemplateRepository,
    tasks: VehicleTaskRepository,
}

impl CommissioningService {
    pub fn new(templates: TaskTemplateRepository, tasks: VehicleTaskRepository) -> Self {
        Self { templates, tasks }
    }

    /// Materializar una VehicleTask por cada template aplicable al
    /// vehículo. No re-materializa si el vehículo ya tiene tareas.
    pub async fn materialize_tasks(&self, vehicle: &Vehicle) -> AppResult<u64> {
        if self.tasks.has_tasks(vehicle.id).await? {
            log::info!(
                "ℹ️  El vehículo {} ya tiene checklist, no se re-materializa",
                vehicle.vehicle_id
            );
            return Ok(0);
        }

        let templates = self
            .templates
            .find_for_vehicle(&vehicle.vehicle_type, vehicle.region_id)
            .await?;

        let new_tasks = build_tasks_from_templates(vehicle, &templates, Utc::now());
        let created = self.tasks.create_many(&new_tasks).await?;

        log::info!(
            "✅ Materializadas {} tareas de comisionado para {}",
            created,
            vehicle.vehicle_id
        );

        Ok(created)
    }

    /// Aplicar una transición validada y persistirla
    pub async fn apply_transition(
        &self,
        task_id: Uuid,
        request: TransitionRequest,
        percent_complete: Option<i32>,
    ) -> AppResult<VehicleTask> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        validate_transition(&task, &request).map_err(AppError::BadRequest)?;

        let percent = percent_complete
            .unwrap_or_else(|| default_percent_for(request.to, task.percent_complete));

        let updated = self
            .tasks
            .update_status(
                task.id,
                request.to.as_str(),
                percent,
                request.evidence_url.as_deref(),
                request.approver,
            )
            .await?;

        log::info!(
            "🔄 Tarea '{}' pasó a '{}' ({}%)",
            updated.step_name,
            updated.status,
            updated.percent_complete
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus::*;

    fn task(status: &str, requires_evidence: bool, requires_approval: bool) -> VehicleTask {
        let now = Utc::now();
        VehicleTask {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            template_id: None,
            step_name: "CHP Inspection".to_string(),
            step_category: "Compliance".to_string(),
            status: status.to_string(),
            percent_complete: 0,
            assignee_id: None,
            approved_by: None,
            due_date: None,
            evidence_url: None,
            requires_evidence,
            requires_approval,
            sla_hours: 48,
            dependent_step_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(to: TaskStatus) -> TransitionRequest {
        TransitionRequest {
            to,
            evidence_url: None,
            approver: None,
        }
    }

    #[test]
    fn test_legal_chain_passes() {
        let mut t = task("Not Started", false, false);
        assert!(validate_transition(&t, &transition(InProgress)).is_ok());
        t.status = "In Progress".to_string();
        assert!(validate_transition(&t, &transition(Submitted)).is_ok());
        t.status = "Submitted".to_string();
        assert!(validate_transition(&t, &transition(Rejected)).is_ok());
    }

    #[test]
    fn test_illegal_jump_rejected() {
        let t = task("Not Started", false, false);
        let err = validate_transition(&t, &transition(Approved)).unwrap_err();
        assert!(err.contains("Illegal transition"));
    }

    #[test]
    fn test_terminal_states_immutable() {
        let t = task("Approved", false, false);
        assert!(validate_transition(&t, &transition(InProgress)).is_err());
        let t = task("Rejected", false, false);
        assert!(validate_transition(&t, &transition(Submitted)).is_err());
    }

    #[test]
    fn test_submit_requires_evidence() {
        let t = task("In Progress", true, false);
        let err = validate_transition(&t, &transition(Submitted)).unwrap_err();
        assert!(err.contains("evidence"));

        // Con evidencia en el request pasa
        let request = TransitionRequest {
            to: Submitted,
            evidence_url: Some("s3://evidence/chp.pdf".to_string()),
            approver: None,
        };
        assert!(validate_transition(&t, &request).is_ok());

        // O con evidencia ya adjunta a la tarea
        let mut with_evidence = task("In Progress", true, false);
        with_evidence.evidence_url = Some("s3://evidence/chp.pdf".to_string());
        assert!(validate_transition(&with_evidence, &transition(Submitted)).is_ok());
    }

    #[test]
    fn test_approve_requires_approver() {
        let t = task("Submitted", false, true);
        let err = validate_transition(&t, &transition(Approved)).unwrap_err();
        assert!(err.contains("approver"));

        let request = TransitionRequest {
            to: Approved,
            evidence_url: None,
            approver: Some(Uuid::new_v4()),
        };
        assert!(validate_transition(&t, &request).is_ok());
    }

    #[test]
    fn test_blocked_round_trip() {
        let mut t = task("In Progress", false, false);
        assert!(validate_transition(&t, &transition(Blocked)).is_ok());
        t.status = "Blocked".to_string();
        assert!(validate_transition(&t, &transition(InProgress)).is_ok());
        assert!(validate_transition(&t, &transition(Submitted)).is_err());
    }

    #[test]
    fn test_dependency_satisfaction() {
        let mut predecessor = task("Approved", false, false);
        predecessor.step_name = "Camera Setup".to_string();

        let mut dependent = task("Not Started", false, false);
        dependent.dependent_step_id = Some("Camera Setup".to_string());

        let siblings = vec![predecessor.clone(), dependent.clone()];
        assert!(is_dependency_satisfied(&dependent, &siblings));

        let mut unfinished = predecessor.clone();
        unfinished.status = "In Progress".to_string();
        let siblings = vec![unfinished, dependent.clone()];
        assert!(!is_dependency_satisfied(&dependent, &siblings));

        // Sin predecesor siempre satisfecho
        let free = task("Not Started", false, false);
        assert!(is_dependency_satisfied(&free, &[]));
    }

    #[test]
    fn test_build_tasks_from_templates() {
        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            vehicle_id: "E450-1".to_string(),
            vin: "1FDXE45P84HB12345".to_string(),
            plate: None,
            make: "Ford".to_string(),
            model: "E-450".to_string(),
            year: 2023,
            vehicle_type: "ALS".to_string(),
            status: "Commissioning".to_string(),
            region_id: None,
            commissioning_template: None,
            odometer: 0,
            fuel_type: None,
            in_service_date: None,
            primary_depot: None,
            radio_id: None,
            lytx_id: None,
            last_chp_inspection: None,
            next_chp_inspection: None,
            created_at: now,
        };

        let template = TaskTemplate {
            id: Uuid::new_v4(),
            template_id: "STD-ALS".to_string(),
            name: "Standard ALS".to_string(),
            region_id: None,
            vehicle_type: "ALS".to_string(),
            step_order: 1,
            step_name: "CHP Inspection".to_string(),
            step_category: "Compliance".to_string(),
            sla_hours: 48,
            requires_evidence: true,
            requires_approval: true,
            evidence_type: Some("document".to_string()),
            dependent_step_id: None,
            created_at: now,
        };

        let tasks = build_tasks_from_templates(&vehicle, &[template.clone()], now);
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.vehicle_id, vehicle.id);
        assert_eq!(t.template_id, Some(template.id));
        assert_eq!(t.step_name, "CHP Inspection");
        assert_eq!(t.due_date, Some(now + Duration::hours(48)));
        assert!(t.requires_evidence);
        assert!(t.requires_approval);
    }

    #[test]
    fn test_default_percent() {
        assert_eq!(default_percent_for(Approved, 60), 100);
        assert_eq!(default_percent_for(NotStarted, 60), 0);
        assert_eq!(default_percent_for(Submitted, 90), 90);
    }
}
