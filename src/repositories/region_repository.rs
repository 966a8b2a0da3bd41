use crate::models::region::Region;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Repositorio de regiones (datos de referencia, solo lectura)
pub struct RegionRepository {
    pool: PgPool,
}

impl RegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Region>, AppError> {
        let regions = sqlx::query_as::<_, Region>("SELECT * FROM regions ORDER BY code")
            .fetch_all(&self.pool)
            .await?;

        Ok(regions)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Region>, AppError> {
        let region = sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(region)
    }

    /// Mapa código → id, usado por el import CSV para resolver regiones
    pub async fn code_map(&self) -> Result<HashMap<String, Uuid>, AppError> {
        let regions = self.find_all().await?;
        Ok(regions.into_iter().map(|r| (r.code, r.id)).collect())
    }
}
