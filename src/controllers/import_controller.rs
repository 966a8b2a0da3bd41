//! Controller del import CSV

use sqlx::PgPool;

use crate::dto::import_dto::ImportReport;
use crate::models::auth::AuthUser;
use crate::repositories::region_repository::RegionRepository;
use crate::repositories::task_template_repository::TaskTemplateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service::{require_admin, require_edit_vehicles};
use crate::services::csv_import_service::CsvImportService;
use crate::utils::errors::AppResult;

pub struct ImportController {
    service: CsvImportService,
}

impl ImportController {
    pub fn new(pool: PgPool, user: &AuthUser) -> Self {
        Self {
            service: CsvImportService::new(
                VehicleRepository::new(pool.clone(), user.tenant_type),
                TaskTemplateRepository::new(pool.clone()),
                RegionRepository::new(pool),
            ),
        }
    }

    pub async fn import_vehicles(&self, user: &AuthUser, csv: &str) -> AppResult<ImportReport> {
        require_edit_vehicles(user)?;
        self.service.import_vehicles(csv).await
    }

    /// Los templates definen el workflow canónico: solo admin
    pub async fn import_task_templates(&self, user: &AuthUser, csv: &str) -> AppResult<ImportReport> {
        require_admin(user)?;
        self.service.import_task_templates(csv).await
    }
}
