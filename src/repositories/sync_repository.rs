//! Repositorio de sincronización Smartsheet
//!
//! Filas con upsert last-write-wins por (sheet_id, row_id), historial
//! append-only y configuración de auto-sync por hoja.

use crate::models::sync::{SheetRow, SyncConfig, SyncLog};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SyncRepository {
    pool: PgPool,
}

impl SyncRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert de una fila de hoja: la última escritura gana
    pub async fn upsert_row(
        &self,
        sheet_id: &str,
        row_id: &str,
        row_number: i32,
        data: &serde_json::Value,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO smartsheet_data (sheet_id, row_id, row_number, data, synced_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (sheet_id, row_id)
            DO UPDATE SET row_number = EXCLUDED.row_number,
                          data = EXCLUDED.data,
                          synced_at = EXCLUDED.synced_at
            "#,
        )
        .bind(sheet_id)
        .bind(row_id)
        .bind(row_number)
        .bind(data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_rows(&self, sheet_id: &str) -> Result<Vec<SheetRow>, AppError> {
        let rows = sqlx::query_as::<_, SheetRow>(
            "SELECT * FROM smartsheet_data WHERE sheet_id = $1 ORDER BY row_number",
        )
        .bind(sheet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Registrar un intento de sincronización (append-only, uno por hoja)
    pub async fn insert_log(
        &self,
        sheet_id: &str,
        status: &str,
        rows_synced: Option<i32>,
        error_message: Option<&str>,
    ) -> Result<SyncLog, AppError> {
        let log = sqlx::query_as::<_, SyncLog>(
            r#"
            INSERT INTO smartsheet_sync_log (id, sheet_id, status, rows_synced, error_message, synced_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sheet_id)
        .bind(status)
        .bind(rows_synced)
        .bind(error_message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    pub async fn list_logs(&self, limit: i64) -> Result<Vec<SyncLog>, AppError> {
        let logs = sqlx::query_as::<_, SyncLog>(
            "SELECT * FROM smartsheet_sync_log ORDER BY synced_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn upsert_config(
        &self,
        sheet_id: &str,
        sheet_name: &str,
        sync_interval_minutes: i32,
    ) -> Result<SyncConfig, AppError> {
        let now = Utc::now();
        let config = sqlx::query_as::<_, SyncConfig>(
            r#"
            INSERT INTO smartsheet_sync_config
                (id, sheet_id, sheet_name, sync_enabled, sync_interval_minutes, last_synced_at, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, $4, NULL, $5, $5)
            ON CONFLICT (sheet_id)
            DO UPDATE SET sheet_name = EXCLUDED.sheet_name,
                          sync_interval_minutes = EXCLUDED.sync_interval_minutes,
                          updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sheet_id)
        .bind(sheet_name)
        .bind(sync_interval_minutes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn list_configs(&self) -> Result<Vec<SyncConfig>, AppError> {
        let configs = sqlx::query_as::<_, SyncConfig>(
            "SELECT * FROM smartsheet_sync_config ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(configs)
    }

    pub async fn toggle_config(&self, config_id: Uuid, enabled: bool) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE smartsheet_sync_config SET sync_enabled = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(config_id)
        .bind(enabled)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sync config not found".to_string()));
        }

        Ok(())
    }

    pub async fn touch_last_synced(&self, sheet_id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE smartsheet_sync_config SET last_synced_at = $2, updated_at = $2 WHERE sheet_id = $1",
        )
        .bind(sheet_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
