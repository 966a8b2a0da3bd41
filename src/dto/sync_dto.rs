//! DTOs de la integración con Smartsheet
//!
//! Payloads de la API externa (ids numéricos, camelCase) y los
//! resultados por hoja que devuelve el adaptador.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Hoja disponible según el endpoint de listado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "accessLevel", skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(rename = "modifiedAt", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

/// Envoltura del listado de hojas (`GET /sheets`)
#[derive(Debug, Deserialize)]
pub struct SheetListPayload {
    #[serde(default)]
    pub data: Vec<SheetInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetColumn {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetCell {
    #[serde(rename = "columnId")]
    pub column_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "displayValue", skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRowPayload {
    pub id: i64,
    #[serde(rename = "rowNumber", default)]
    pub row_number: Option<i32>,
    #[serde(default)]
    pub cells: Vec<SheetCell>,
}

/// Detalle de una hoja (`GET /sheets/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<SheetColumn>,
    #[serde(default)]
    pub rows: Vec<SheetRowPayload>,
}

/// Resultado de fetch por hoja: el aislamiento de fallos es por hoja
#[derive(Debug, Serialize)]
pub struct SheetFetchOutcome {
    pub sheet_id: String,
    pub data: Option<SheetDetail>,
    pub error: Option<String>,
}

/// Resultado de sincronización por hoja
#[derive(Debug, Serialize)]
pub struct SheetSyncOutcome {
    pub sheet_id: String,
    pub status: String,
    pub rows_synced: i32,
    pub error: Option<String>,
}

/// Request de fetch/sync manual
#[derive(Debug, Deserialize)]
pub struct SheetIdsRequest {
    pub sheet_ids: Vec<String>,
}

/// Request para configurar auto-sync de una hoja
#[derive(Debug, Deserialize, Validate)]
pub struct AddSyncConfigRequest {
    #[validate(length(min = 1, max = 50))]
    pub sheet_id: String,

    #[validate(length(min = 1, max = 200))]
    pub sheet_name: String,

    #[validate(range(min = 1, max = 1440))]
    pub sync_interval_minutes: Option<i32>,
}

/// Request para activar/desactivar el auto-sync
#[derive(Debug, Deserialize)]
pub struct ToggleSyncRequest {
    pub enabled: bool,
}
