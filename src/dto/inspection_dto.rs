//! DTOs de inspecciones

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request para programar una inspección
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInspectionRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 50))]
    pub inspection_type: String,

    pub scheduled_date: NaiveDate,

    #[validate(length(max = 100))]
    pub inspector: Option<String>,
}

/// Request para registrar el resultado de una inspección
#[derive(Debug, Deserialize, Validate)]
pub struct RecordInspectionResultRequest {
    pub result: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
