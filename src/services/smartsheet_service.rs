//! Adaptador de sincronización con Smartsheet
//!
//! Lista hojas, trae hojas seleccionadas con fan-out concurrente y
//! aislamiento de fallos por hoja, y sincroniza filas a almacenamiento
//! local con upsert por (sheet_id, row_id). Cada intento de sync deja
//! exactamente una entrada de log por hoja.

use futures::future::join_all;
use reqwest::Client;
use std::collections::HashMap;

use crate::dto::sync_dto::{
    SheetDetail, SheetFetchOutcome, SheetInfo, SheetListPayload, SheetSyncOutcome,
};
use crate::repositories::sync_repository::SyncRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct SmartsheetService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    sync_repo: SyncRepository,
}

impl SmartsheetService {
    pub fn new(
        client: Client,
        base_url: String,
        api_key: Option<String>,
        sync_repo: SyncRepository,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            sync_repo,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("SMARTSHEET_API_KEY is not configured".to_string()))
    }

    /// Listar todas las hojas disponibles
    pub async fn list_sheets(&self) -> AppResult<Vec<SheetInfo>> {
        let api_key = self.api_key()?;
        let url = format!("{}/sheets", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Smartsheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Smartsheet list falló: {} {}", status, body);
            return Err(AppError::ExternalApi(format!(
                "Smartsheet API error: {}",
                status
            )));
        }

        let payload: SheetListPayload = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Smartsheet response: {}", e)))?;

        log::info!("📄 Smartsheet devolvió {} hojas", payload.data.len());

        Ok(payload.data)
    }

    /// Traer una hoja; el error queda en String para aislarlo por hoja
    async fn fetch_sheet(&self, sheet_id: &str) -> Result<SheetDetail, String> {
        let api_key = self.api_key().map_err(|e| e.to_string())?;
        let url = format!("{}/sheets/{}", self.base_url, sheet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Failed to fetch sheet: {}", response.status()));
        }

        response
            .json::<SheetDetail>()
            .await
            .map_err(|e| format!("Invalid sheet payload: {}", e))
    }

    /// Fan-out concurrente sobre las hojas seleccionadas.
    ///
    /// Una hoja lenta o rota no bloquea a las demás: cada resultado
    /// lleva su data o su error.
    pub async fn fetch_sheets(&self, sheet_ids: &[String]) -> Vec<SheetFetchOutcome> {
        let futures = sheet_ids.iter().map(|sheet_id| async move {
            match self.fetch_sheet(sheet_id).await {
                Ok(data) => {
                    log::info!("✅ Hoja {} ({}) recibida", sheet_id, data.name);
                    SheetFetchOutcome {
                        sheet_id: sheet_id.clone(),
                        data: Some(data),
                        error: None,
                    }
                }
                Err(error) => {
                    log::error!("❌ Error trayendo hoja {}: {}", sheet_id, error);
                    SheetFetchOutcome {
                        sheet_id: sheet_id.clone(),
                        data: None,
                        error: Some(error),
                    }
                }
            }
        });

        join_all(futures).await
    }

    /// Sincronizar hojas: upsert de cada fila + una entrada de log por
    /// hoja por intento. Las escrituras ya emitidas no se revierten si
    /// el caller abandona la operación.
    pub async fn sync_sheets(&self, sheet_ids: &[String]) -> AppResult<Vec<SheetSyncOutcome>> {
        let fetched = self.fetch_sheets(sheet_ids).await;
        let mut outcomes = Vec::with_capacity(fetched.len());

        for outcome in fetched {
            let sheet_id = outcome.sheet_id;

            let detail = match outcome.data {
                Some(detail) => detail,
                None => {
                    let error = outcome.error.unwrap_or_else(|| "Unknown error".to_string());
                    self.sync_repo
                        .insert_log(&sheet_id, "error", None, Some(&error))
                        .await?;
                    outcomes.push(SheetSyncOutcome {
                        sheet_id,
                        status: "error".to_string(),
                        rows_synced: 0,
                        error: Some(error),
                    });
                    continue;
                }
            };

            match self.persist_sheet(&sheet_id, &detail).await {
                Ok(rows_synced) => {
                    self.sync_repo
                        .insert_log(&sheet_id, "success", Some(rows_synced), None)
                        .await?;
                    self.sync_repo.touch_last_synced(&sheet_id).await?;
                    log::info!("✅ Hoja {} sincronizada: {} filas", sheet_id, rows_synced);
                    outcomes.push(SheetSyncOutcome {
                        sheet_id,
                        status: "success".to_string(),
                        rows_synced,
                        error: None,
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    self.sync_repo
                        .insert_log(&sheet_id, "error", None, Some(&error))
                        .await?;
                    log::error!("❌ Error persistiendo hoja {}: {}", sheet_id, error);
                    outcomes.push(SheetSyncOutcome {
                        sheet_id,
                        status: "error".to_string(),
                        rows_synced: 0,
                        error: Some(error),
                    });
                }
            }
        }

        Ok(outcomes)
    }

    /// Upsert de todas las filas de una hoja; la última escritura gana
    async fn persist_sheet(&self, sheet_id: &str, detail: &SheetDetail) -> AppResult<i32> {
        let column_titles: HashMap<i64, &str> = detail
            .columns
            .iter()
            .map(|c| (c.id, c.title.as_str()))
            .collect();

        let mut rows_synced = 0i32;

        for row in &detail.rows {
            let mut data = serde_json::Map::new();
            for cell in &row.cells {
                let title = match column_titles.get(&cell.column_id) {
                    Some(title) => (*title).to_string(),
                    None => continue,
                };
                let value = match (&cell.display_value, &cell.value) {
                    (Some(display), _) => serde_json::Value::String(display.clone()),
                    (None, Some(value)) => value.clone(),
                    (None, None) => serde_json::Value::Null,
                };
                data.insert(title, value);
            }

            self.sync_repo
                .upsert_row(
                    sheet_id,
                    &row.id.to_string(),
                    row.row_number.unwrap_or(0),
                    &serde_json::Value::Object(data),
                )
                .await?;
            rows_synced += 1;
        }

        Ok(rows_synced)
    }
}

/// Exportar una hoja como texto CSV
///
/// Celdas entre comillas con `""` como escape; usa displayValue cuando
/// existe. Pensado para servirse como descarga text/csv.
pub fn export_sheet_to_csv(detail: &SheetDetail) -> String {
    fn quote(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }

    let mut lines = Vec::with_capacity(detail.rows.len() + 1);

    let headers: Vec<String> = detail.columns.iter().map(|c| quote(&c.title)).collect();
    lines.push(headers.join(","));

    for row in &detail.rows {
        let cell_by_column: HashMap<i64, String> = row
            .cells
            .iter()
            .map(|cell| {
                let value = cell
                    .display_value
                    .clone()
                    .or_else(|| {
                        cell.value.as_ref().map(|v| match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                    })
                    .unwrap_or_default();
                (cell.column_id, value)
            })
            .collect();

        let values: Vec<String> = detail
            .columns
            .iter()
            .map(|col| quote(cell_by_column.get(&col.id).map(String::as_str).unwrap_or("")))
            .collect();
        lines.push(values.join(","));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::sync_dto::{SheetCell, SheetColumn, SheetRowPayload};

    fn sample_sheet() -> SheetDetail {
        SheetDetail {
            id: 42,
            name: "Fleet Roster".to_string(),
            columns: vec![
                SheetColumn { id: 1, title: "Unit".to_string() },
                SheetColumn { id: 2, title: "Depot \"North\"".to_string() },
            ],
            rows: vec![SheetRowPayload {
                id: 100,
                row_number: Some(1),
                cells: vec![
                    SheetCell {
                        column_id: 1,
                        value: Some(serde_json::json!("E450-1")),
                        display_value: Some("E450-1".to_string()),
                    },
                    SheetCell {
                        column_id: 2,
                        value: None,
                        display_value: None,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_export_csv_quotes_and_escapes() {
        let csv = export_sheet_to_csv(&sample_sheet());
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "\"Unit\",\"Depot \"\"North\"\"\"");
        assert_eq!(lines.next().unwrap(), "\"E450-1\",\"\"");
        assert!(lines.next().is_none());
    }
}
