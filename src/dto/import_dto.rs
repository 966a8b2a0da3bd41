//! DTOs del import CSV

use serde::{Deserialize, Serialize};

/// Entidad destino de un import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportEntity {
    Vehicles,
    TaskTemplates,
}

impl ImportEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportEntity::Vehicles => "vehicles",
            ImportEntity::TaskTemplates => "task_templates",
        }
    }
}

/// Resultado agregado de un import: filas persistidas + errores por fila
/// (o por batch), en orden.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub entity: ImportEntity,
    pub success_count: usize,
    pub errors: Vec<String>,
}
