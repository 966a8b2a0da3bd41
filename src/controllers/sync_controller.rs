//! Controller de sincronización Smartsheet
//!
//! Todas las acciones exigen tenant interno con rol admin o supervisor,
//! verificado server-side en cada entrada.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::common::ApiResponse;
use crate::dto::sync_dto::{
    AddSyncConfigRequest, SheetFetchOutcome, SheetInfo, SheetSyncOutcome, ToggleSyncRequest,
};
use crate::models::auth::AuthUser;
use crate::models::sync::{SyncConfig, SyncLog};
use crate::repositories::sync_repository::SyncRepository;
use crate::services::authorization_service::require_sync_operator;
use crate::services::smartsheet_service::{export_sheet_to_csv, SmartsheetService};
use crate::utils::errors::{AppError, AppResult};

const DEFAULT_SYNC_INTERVAL_MINUTES: i32 = 5;

pub struct SyncController {
    service: SmartsheetService,
    sync_repo: SyncRepository,
}

impl SyncController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig, http_client: reqwest::Client) -> Self {
        Self {
            service: SmartsheetService::new(
                http_client,
                config.smartsheet_base_url.clone(),
                config.smartsheet_api_key.clone(),
                SyncRepository::new(pool.clone()),
            ),
            sync_repo: SyncRepository::new(pool),
        }
    }

    pub async fn list_sheets(&self, user: &AuthUser) -> AppResult<Vec<SheetInfo>> {
        require_sync_operator(user)?;
        self.service.list_sheets().await
    }

    pub async fn fetch_sheets(
        &self,
        user: &AuthUser,
        sheet_ids: Vec<String>,
    ) -> AppResult<Vec<SheetFetchOutcome>> {
        require_sync_operator(user)?;

        if sheet_ids.is_empty() {
            return Err(AppError::BadRequest("No sheets selected".to_string()));
        }

        Ok(self.service.fetch_sheets(&sheet_ids).await)
    }

    pub async fn sync_sheets(
        &self,
        user: &AuthUser,
        sheet_ids: Vec<String>,
    ) -> AppResult<Vec<SheetSyncOutcome>> {
        require_sync_operator(user)?;

        if sheet_ids.is_empty() {
            return Err(AppError::BadRequest("No sheets selected".to_string()));
        }

        self.service.sync_sheets(&sheet_ids).await
    }

    /// Exportar una hoja como CSV (descarga text/csv)
    pub async fn export_sheet_csv(&self, user: &AuthUser, sheet_id: &str) -> AppResult<(String, String)> {
        require_sync_operator(user)?;

        let outcomes = self.service.fetch_sheets(&[sheet_id.to_string()]).await;
        let outcome = outcomes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Empty fetch result".to_string()))?;

        let detail = outcome
            .data
            .ok_or_else(|| AppError::ExternalApi(outcome.error.unwrap_or_default()))?;

        let filename = format!(
            "{}.csv",
            detail
                .name
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>()
        );

        Ok((filename, export_sheet_to_csv(&detail)))
    }

    pub async fn add_config(
        &self,
        user: &AuthUser,
        request: AddSyncConfigRequest,
    ) -> AppResult<ApiResponse<SyncConfig>> {
        require_sync_operator(user)?;
        request.validate()?;

        let config = self
            .sync_repo
            .upsert_config(
                &request.sheet_id,
                &request.sheet_name,
                request
                    .sync_interval_minutes
                    .unwrap_or(DEFAULT_SYNC_INTERVAL_MINUTES),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            config,
            format!("Auto-sync habilitado para {}", request.sheet_name),
        ))
    }

    pub async fn list_configs(&self, user: &AuthUser) -> AppResult<Vec<SyncConfig>> {
        require_sync_operator(user)?;
        self.sync_repo.list_configs().await
    }

    pub async fn toggle_config(
        &self,
        user: &AuthUser,
        config_id: Uuid,
        request: ToggleSyncRequest,
    ) -> AppResult<ApiResponse<()>> {
        require_sync_operator(user)?;

        self.sync_repo.toggle_config(config_id, request.enabled).await?;

        Ok(ApiResponse::success_with_message(
            (),
            if request.enabled {
                "Auto-sync activado".to_string()
            } else {
                "Auto-sync desactivado".to_string()
            },
        ))
    }

    pub async fn list_logs(&self, user: &AuthUser) -> AppResult<Vec<SyncLog>> {
        require_sync_operator(user)?;
        self.sync_repo.list_logs(50).await
    }
}
