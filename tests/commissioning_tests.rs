//! Invariantes del workflow de comisionado

use chrono::{Duration, Utc};
use uuid::Uuid;

use fleet_command::models::task::{TaskStatus, TaskTemplate, VehicleTask};
use fleet_command::models::vehicle::Vehicle;
use fleet_command::services::commissioning_service::{
    build_tasks_from_templates, validate_transition, TransitionRequest,
};

fn task(status: &str) -> VehicleTask {
    let now = Utc::now();
    VehicleTask {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        template_id: None,
        step_name: "Radio/CAD Configuration".to_string(),
        step_category: "IT".to_string(),
        status: status.to_string(),
        percent_complete: 0,
        assignee_id: None,
        approved_by: None,
        due_date: None,
        evidence_url: None,
        requires_evidence: false,
        requires_approval: false,
        sla_hours: 24,
        dependent_step_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn to(status: TaskStatus) -> TransitionRequest {
    TransitionRequest {
        to: status,
        evidence_url: None,
        approver: None,
    }
}

fn vehicle(vehicle_type: &str, region_id: Option<Uuid>) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        vehicle_id: "E450-OC-1023".to_string(),
        vin: "1FDXE45P84HB12345".to_string(),
        plate: Some("AMB-1023".to_string()),
        make: "Ford".to_string(),
        model: "E-450".to_string(),
        year: 2023,
        vehicle_type: vehicle_type.to_string(),
        status: "Commissioning".to_string(),
        region_id,
        commissioning_template: None,
        odometer: 0,
        fuel_type: None,
        in_service_date: None,
        primary_depot: None,
        radio_id: None,
        lytx_id: None,
        last_chp_inspection: None,
        next_chp_inspection: None,
        created_at: Utc::now(),
    }
}

fn template(step_order: i32, step_name: &str, sla_hours: i32) -> TaskTemplate {
    TaskTemplate {
        id: Uuid::new_v4(),
        template_id: "STD-ALS".to_string(),
        name: "Standard ALS".to_string(),
        region_id: None,
        vehicle_type: "ALS".to_string(),
        step_order,
        step_name: step_name.to_string(),
        step_category: "Compliance".to_string(),
        sla_hours,
        requires_evidence: false,
        requires_approval: true,
        evidence_type: None,
        dependent_step_id: None,
        created_at: Utc::now(),
    }
}

#[test]
fn full_happy_path_is_legal() {
    let mut t = task("Not Started");
    for (from, next) in [
        ("Not Started", TaskStatus::InProgress),
        ("In Progress", TaskStatus::Submitted),
        ("Submitted", TaskStatus::Approved),
    ] {
        t.status = from.to_string();
        let request = TransitionRequest {
            to: next,
            evidence_url: None,
            approver: Some(Uuid::new_v4()),
        };
        assert!(validate_transition(&t, &request).is_ok(), "{} -> {:?}", from, next);
    }
}

#[test]
fn approved_is_not_reopenable() {
    let t = task("Approved");
    for target in [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Submitted,
        TaskStatus::Rejected,
    ] {
        assert!(validate_transition(&t, &to(target)).is_err());
    }
}

#[test]
fn evidence_guard_applies_on_submit_only() {
    let mut t = task("In Progress");
    t.requires_evidence = true;

    assert!(validate_transition(&t, &to(TaskStatus::Submitted)).is_err());
    // Blocked no exige evidencia
    assert!(validate_transition(&t, &to(TaskStatus::Blocked)).is_ok());
}

#[test]
fn approval_guard_requires_an_approver() {
    let mut t = task("Submitted");
    t.requires_approval = true;

    assert!(validate_transition(&t, &to(TaskStatus::Approved)).is_err());
    // Rechazar no exige aprobador
    assert!(validate_transition(&t, &to(TaskStatus::Rejected)).is_ok());

    let approved = TransitionRequest {
        to: TaskStatus::Approved,
        evidence_url: None,
        approver: Some(Uuid::new_v4()),
    };
    assert!(validate_transition(&t, &approved).is_ok());
}

#[test]
fn materialization_copies_template_rules() {
    let now = Utc::now();
    let v = vehicle("ALS", None);
    let templates = vec![
        template(1, "CHP Inspection", 48),
        template(2, "Decals Application", 24),
        template(3, "Regional Certification", 72),
    ];

    let tasks = build_tasks_from_templates(&v, &templates, now);

    assert_eq!(tasks.len(), 3);
    for (task, template) in tasks.iter().zip(&templates) {
        assert_eq!(task.vehicle_id, v.id);
        assert_eq!(task.template_id, Some(template.id));
        assert_eq!(task.step_name, template.step_name);
        assert_eq!(task.sla_hours, template.sla_hours);
        assert_eq!(
            task.due_date,
            Some(now + Duration::hours(template.sla_hours as i64))
        );
        assert_eq!(task.requires_approval, template.requires_approval);
    }
}

#[test]
fn sla_breach_requires_elapsed_deadline_and_open_status() {
    let mut t = task("In Progress");
    t.sla_hours = 24;
    t.created_at = Utc::now() - Duration::hours(30);

    assert!(t.is_sla_breached(Utc::now()));

    // Mismo vencimiento, estado terminal: no cuenta
    t.status = "Rejected".to_string();
    assert!(!t.is_sla_breached(Utc::now()));

    // Estado abierto, todavía dentro del plazo
    let mut fresh = task("In Progress");
    fresh.sla_hours = 24;
    assert!(!fresh.is_sla_breached(Utc::now()));
}
