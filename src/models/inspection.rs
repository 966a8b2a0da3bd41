//! Modelo de Inspection
//!
//! Registro programado de inspección con resultado Pass/Fail/Pending.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Resultado de inspección - mapea al ENUM inspection_result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionResult {
    Pass,
    Fail,
    Pending,
}

impl InspectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionResult::Pass => "Pass",
            InspectionResult::Fail => "Fail",
            InspectionResult::Pending => "Pending",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Pass" => Some(InspectionResult::Pass),
            "Fail" => Some(InspectionResult::Fail),
            "Pending" => Some(InspectionResult::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Inspection {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub inspection_type: String,
    pub scheduled_date: NaiveDate,
    pub result: String,
    pub inspector: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
