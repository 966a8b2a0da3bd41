//! Modelos del workflow de comisionado
//!
//! TaskTemplate define el checklist canónico por tipo de vehículo y región;
//! VehicleTask es la instancia materializada para un vehículo concreto.
//! La máquina de estados de TaskStatus se valida de forma central: todo
//! write path (formularios, aprobaciones e import masivo) pasa por
//! `can_transition`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Categoría del paso - mapea al ENUM task_category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    Safety,
    Compliance,
    Logistics,
    #[serde(rename = "IT")]
    It,
    Branding,
    Clinical,
    Admin,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Safety => "Safety",
            TaskCategory::Compliance => "Compliance",
            TaskCategory::Logistics => "Logistics",
            TaskCategory::It => "IT",
            TaskCategory::Branding => "Branding",
            TaskCategory::Clinical => "Clinical",
            TaskCategory::Admin => "Admin",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Safety" => Some(TaskCategory::Safety),
            "Compliance" => Some(TaskCategory::Compliance),
            "Logistics" => Some(TaskCategory::Logistics),
            "IT" => Some(TaskCategory::It),
            "Branding" => Some(TaskCategory::Branding),
            "Clinical" => Some(TaskCategory::Clinical),
            "Admin" => Some(TaskCategory::Admin),
            _ => None,
        }
    }
}

/// Estado de una tarea - mapea al ENUM task_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Blocked,
    Submitted,
    Approved,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Submitted => "Submitted",
            TaskStatus::Approved => "Approved",
            TaskStatus::Rejected => "Rejected",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Not Started" => Some(TaskStatus::NotStarted),
            "In Progress" => Some(TaskStatus::InProgress),
            "Blocked" => Some(TaskStatus::Blocked),
            "Submitted" => Some(TaskStatus::Submitted),
            "Approved" => Some(TaskStatus::Approved),
            "Rejected" => Some(TaskStatus::Rejected),
            _ => None,
        }
    }

    /// Estados terminales: no admiten ninguna transición de salida
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Approved | TaskStatus::Rejected)
    }

    /// Transiciones legales de la máquina de estados.
    ///
    /// Not Started → In Progress → {Submitted, Blocked};
    /// Blocked → In Progress; Submitted → {Approved, Rejected}.
    pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (from, to),
            (NotStarted, InProgress)
                | (InProgress, Submitted)
                | (InProgress, Blocked)
                | (Blocked, InProgress)
                | (Submitted, Approved)
                | (Submitted, Rejected)
        )
    }
}

/// Paso canónico del checklist - mapea a la tabla task_templates
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskTemplate {
    pub id: Uuid,
    pub template_id: String,
    pub name: String,
    pub region_id: Option<Uuid>,
    pub vehicle_type: String,
    pub step_order: i32,
    pub step_name: String,
    pub step_category: String,
    pub sla_hours: i32,
    pub requires_evidence: bool,
    pub requires_approval: bool,
    pub evidence_type: Option<String>,
    // Un solo predecesor opcional, nunca un grafo general
    pub dependent_step_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registro validado de template, producido por el import CSV
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskTemplate {
    pub template_id: String,
    pub name: String,
    pub region_id: Option<Uuid>,
    pub vehicle_type: super::vehicle::VehicleType,
    pub step_order: i32,
    pub step_name: String,
    pub step_category: TaskCategory,
    pub sla_hours: i32,
    pub requires_evidence: bool,
    pub requires_approval: bool,
    pub evidence_type: Option<String>,
    pub dependent_step_id: Option<String>,
}

/// Tarea instanciada para un vehículo - mapea a vehicle_tasks (o demo_vehicle_tasks)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleTask {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleTask {
    /// Una tarea incumple su SLA cuando venció el plazo desde su creación
    /// y todavía no alcanzó un estado terminal.
    pub fn is_sla_breached(&self, now: DateTime<Utc>) -> bool {
        let terminal = TaskStatus::parse_str(&self.status)
            .map(|s| s.is_terminal())
            .unwrap_or(false);
        !terminal && now > self.created_at + Duration::hours(self.sla_hours as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_round_trip() {
        for s in ["Not Started", "In Progress", "Blocked", "Submitted", "Approved", "Rejected"] {
            assert_eq!(TaskStatus::parse_str(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_legal_transitions() {
        use TaskStatus::*;
        assert!(TaskStatus::can_transition(NotStarted, InProgress));
        assert!(TaskStatus::can_transition(InProgress, Submitted));
        assert!(TaskStatus::can_transition(InProgress, Blocked));
        assert!(TaskStatus::can_transition(Blocked, InProgress));
        assert!(TaskStatus::can_transition(Submitted, Approved));
        assert!(TaskStatus::can_transition(Submitted, Rejected));
    }

    #[test]
    fn test_illegal_transitions() {
        use TaskStatus::*;
        assert!(!TaskStatus::can_transition(NotStarted, Submitted));
        assert!(!TaskStatus::can_transition(NotStarted, Approved));
        assert!(!TaskStatus::can_transition(InProgress, Approved));
        assert!(!TaskStatus::can_transition(Blocked, Submitted));
        // Los estados terminales son inmutables
        assert!(!TaskStatus::can_transition(Approved, InProgress));
        assert!(!TaskStatus::can_transition(Rejected, Submitted));
        assert!(!TaskStatus::can_transition(Approved, Rejected));
    }

    #[test]
    fn test_sla_breach_boundary() {
        let created = Utc::now() - Duration::hours(48);
        let task = VehicleTask {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            template_id: None,
            step_name: "Camera Setup".to_string(),
            step_category: "IT".to_string(),
            status: "In Progress".to_string(),
            percent_complete: 50,
            assignee_id: None,
            approved_by: None,
            due_date: None,
            evidence_url: None,
            requires_evidence: false,
            requires_approval: false,
            sla_hours: 24,
            dependent_step_id: None,
            created_at: created,
            updated_at: created,
        };

        assert!(task.is_sla_breached(Utc::now()));
        // Dentro del plazo
        assert!(!task.is_sla_breached(created + Duration::hours(24)));

        // Los estados terminales nunca cuentan como vencidos
        let mut approved = task.clone();
        approved.status = "Approved".to_string();
        assert!(!approved.is_sla_breached(Utc::now()));
    }
}
