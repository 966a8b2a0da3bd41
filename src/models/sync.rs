//! Modelos de sincronización con Smartsheet
//!
//! Configuración por hoja, historial append-only de intentos y filas
//! persistidas con clave (sheet_id, row_id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Configuración de auto-sync por hoja - tabla smartsheet_sync_config
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncConfig {
    pub id: Uuid,
    pub sheet_id: String,
    pub sheet_name: String,
    pub sync_enabled: bool,
    pub sync_interval_minutes: i32,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intento de sincronización - tabla smartsheet_sync_log (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncLog {
    pub id: Uuid,
    pub sheet_id: String,
    pub status: String,
    pub rows_synced: Option<i32>,
    pub error_message: Option<String>,
    pub synced_at: DateTime<Utc>,
}

/// Fila persistida de una hoja - tabla smartsheet_data, upsert
/// last-write-wins por (sheet_id, row_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SheetRow {
    pub sheet_id: String,
    pub row_id: String,
    pub row_number: i32,
    pub data: serde_json::Value,
    pub synced_at: DateTime<Utc>,
}
