//! Modelo de Region
//!
//! Datos de referencia inmutables: código corto + nombre.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Region {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}
