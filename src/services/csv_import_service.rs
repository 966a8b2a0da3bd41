//! Pipeline de import CSV
//!
//! Parseo de texto delimitado a mapeos por header, validación fila a
//! fila contra el schema destino (Vehicle o TaskTemplate), y persistencia
//! en batches acotados. Una fila inválida nunca aborta el batch; un batch
//! fallido se reporta como un solo error y no corta los siguientes.
//!
//! Las capas de parseo y validación son puras; la persistencia pasa por
//! los repositorios.

use std::collections::HashMap;

use crate::dto::import_dto::{ImportEntity, ImportReport};
use crate::models::task::{NewTaskTemplate, TaskCategory};
use crate::models::vehicle::{NewVehicle, VehicleStatus, VehicleType};
use crate::repositories::region_repository::RegionRepository;
use crate::repositories::task_template_repository::TaskTemplateRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    error_message, sanitize_csv_cell, validate_date, validate_short_text, validate_vin,
    validate_year,
};
use uuid::Uuid;

/// Tope de tamaño de archivo: 5 MB
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
/// Tope de filas de datos por archivo
pub const MAX_DATA_ROWS: usize = 1000;
/// Tamaño de batch para los INSERT multi-fila
pub const BATCH_SIZE: usize = 100;

/// Fila parseada: número 1-based sobre las filas de datos (el header
/// no cuenta) + celdas saneadas mapeadas por nombre de columna.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub number: usize,
    pub cells: HashMap<String, String>,
}

impl CsvRow {
    /// Celda por nombre de columna; las columnas ausentes cuentan como vacías
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Rechazo temprano por tope de tamaño o de filas: el archivo entero
/// se descarta sin parseo parcial.
pub fn check_file_limits(text: &str) -> Result<(), String> {
    if text.len() > MAX_FILE_BYTES {
        return Err(format!(
            "File exceeds the {} MB size limit",
            MAX_FILE_BYTES / (1024 * 1024)
        ));
    }

    let data_rows = text.lines().filter(|l| !l.trim().is_empty()).count().saturating_sub(1);
    if data_rows > MAX_DATA_ROWS {
        return Err(format!(
            "File has {} data rows, the limit is {}",
            data_rows, MAX_DATA_ROWS
        ));
    }

    Ok(())
}

/// Parsear texto CSV a filas nombradas
///
/// La primera línea no vacía define los headers; las líneas en blanco se
/// saltan. Cada celda pasa por `sanitize_csv_cell` antes de cualquier
/// validación posterior.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => header_line.split(',').map(|h| h.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    lines
        .enumerate()
        .map(|(idx, line)| {
            let values: Vec<&str> = line.split(',').collect();
            let cells = headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let raw = values.get(col).copied().unwrap_or("");
                    (header.clone(), sanitize_csv_cell(raw))
                })
                .collect();

            CsvRow {
                number: idx + 1,
                cells,
            }
        })
        .collect()
}

fn row_error(row: &CsvRow, field: &str, message: &str) -> String {
    format!("Row {}: {}: {}", row.number, field, message)
}

fn parse_int_cell(row: &CsvRow, field: &str) -> Result<i32, String> {
    row.get(field)
        .parse::<i32>()
        .map_err(|_| row_error(row, field, "must be a whole number"))
}

fn parse_bool_cell(row: &CsvRow, field: &str) -> bool {
    matches!(row.get(field), "True" | "true" | "TRUE")
}

fn optional_cell(row: &CsvRow, field: &str) -> Option<String> {
    let value = row.get(field);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn optional_date_cell(row: &CsvRow, field: &str) -> Result<Option<chrono::NaiveDate>, String> {
    match optional_cell(row, field) {
        Some(value) => validate_date(&value)
            .map(Some)
            .map_err(|e| row_error(row, field, &error_message(&e))),
        None => Ok(None),
    }
}

/// Validar una fila contra el schema de Vehicle
///
/// Un código de región desconocido se trata como "sin región", no como
/// error. Type y Status ausentes caen a Other / Draft.
pub fn validate_vehicle_row(
    row: &CsvRow,
    region_map: &HashMap<String, Uuid>,
) -> Result<NewVehicle, String> {
    let vehicle_id = validate_short_text(row.get("VehicleId"), "VehicleId", 50)
        .map_err(|e| row_error(row, "VehicleId", &error_message(&e)))?;

    let vin = validate_vin(row.get("VIN")).map_err(|e| row_error(row, "VIN", &error_message(&e)))?;

    let make = validate_short_text(row.get("Make"), "Make", 100)
        .map_err(|e| row_error(row, "Make", &error_message(&e)))?;

    let model = validate_short_text(row.get("Model"), "Model", 100)
        .map_err(|e| row_error(row, "Model", &error_message(&e)))?;

    let year = parse_int_cell(row, "Year")?;
    validate_year(year).map_err(|e| row_error(row, "Year", &error_message(&e)))?;

    let vehicle_type = match row.get("Type") {
        "" => VehicleType::Other,
        value => VehicleType::parse_str(value)
            .ok_or_else(|| row_error(row, "Type", "is not a valid vehicle type"))?,
    };

    let status = match row.get("Status") {
        "" => VehicleStatus::Draft,
        value => VehicleStatus::parse_str(value)
            .ok_or_else(|| row_error(row, "Status", "is not a valid vehicle status"))?,
    };

    let region_id = region_map.get(row.get("Region")).copied();

    let odometer = match row.get("Odometer") {
        "" => 0,
        _ => {
            let value = parse_int_cell(row, "Odometer")?;
            if value < 0 {
                return Err(row_error(row, "Odometer", "must not be negative"));
            }
            value
        }
    };

    Ok(NewVehicle {
        vehicle_id,
        vin,
        plate: optional_cell(row, "Plate"),
        make,
        model,
        year,
        vehicle_type,
        status,
        region_id,
        commissioning_template: optional_cell(row, "CommissioningTemplate"),
        odometer,
        fuel_type: optional_cell(row, "FuelType"),
        in_service_date: optional_date_cell(row, "InServiceDate")?,
        primary_depot: optional_cell(row, "PrimaryDepot"),
        radio_id: optional_cell(row, "RadioId"),
        lytx_id: optional_cell(row, "LytxId"),
        last_chp_inspection: optional_date_cell(row, "LastCHPInspection")?,
        next_chp_inspection: optional_date_cell(row, "NextCHPInspection")?,
    })
}

/// Validar una fila contra el schema de TaskTemplate
pub fn validate_template_row(
    row: &CsvRow,
    region_map: &HashMap<String, Uuid>,
) -> Result<NewTaskTemplate, String> {
    let template_id = validate_short_text(row.get("TemplateId"), "TemplateId", 50)
        .map_err(|e| row_error(row, "TemplateId", &error_message(&e)))?;

    let name = validate_short_text(row.get("Name"), "Name", 100)
        .map_err(|e| row_error(row, "Name", &error_message(&e)))?;

    let vehicle_type = match row.get("VehicleType") {
        "" => VehicleType::Als,
        value => VehicleType::parse_str(value)
            .ok_or_else(|| row_error(row, "VehicleType", "is not a valid vehicle type"))?,
    };

    let step_order = parse_int_cell(row, "StepOrder")?;
    if step_order < 1 {
        return Err(row_error(row, "StepOrder", "must be 1 or greater"));
    }

    let step_name = validate_short_text(row.get("StepName"), "StepName", 200)
        .map_err(|e| row_error(row, "StepName", &error_message(&e)))?;

    let step_category = TaskCategory::parse_str(row.get("StepCategory"))
        .ok_or_else(|| row_error(row, "StepCategory", "is not a valid task category"))?;

    let sla_hours = parse_int_cell(row, "SLAHours")?;
    if sla_hours < 1 {
        return Err(row_error(row, "SLAHours", "must be 1 or greater"));
    }

    let region_id = region_map.get(row.get("Region")).copied();

    Ok(NewTaskTemplate {
        template_id,
        name,
        region_id,
        vehicle_type,
        step_order,
        step_name,
        step_category,
        sla_hours,
        requires_evidence: parse_bool_cell(row, "RequiresEvidence"),
        requires_approval: parse_bool_cell(row, "RequiresApproval"),
        evidence_type: optional_cell(row, "EvidenceType"),
        dependent_step_id: optional_cell(row, "DependentStepId"),
    })
}

/// Validar todas las filas recolectando errores sin abortar
pub fn validate_rows<T, F>(rows: &[CsvRow], mut validate: F) -> (Vec<T>, Vec<String>)
where
    F: FnMut(&CsvRow) -> Result<T, String>,
{
    let mut valid = Vec::new();
    let mut errors = Vec::new();

    for row in rows {
        match validate(row) {
            Ok(record) => valid.push(record),
            Err(error) => errors.push(error),
        }
    }

    (valid, errors)
}

/// Servicio de import: orquesta parseo, validación y batches
pub struct CsvImportService {
    vehicles: VehicleRepository,
    templates: TaskTemplateRepository,
    regions: RegionRepository,
}

impl CsvImportService {
    pub fn new(
        vehicles: VehicleRepository,
        templates: TaskTemplateRepository,
        regions: RegionRepository,
    ) -> Self {
        Self {
            vehicles,
            templates,
            regions,
        }
    }

    /// Importar vehículos desde texto CSV
    pub async fn import_vehicles(&self, text: &str) -> AppResult<ImportReport> {
        check_file_limits(text).map_err(AppError::BadRequest)?;

        let region_map = self.regions.code_map().await?;
        let rows = parse_csv(text);
        let (valid, mut errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &region_map));

        log::info!(
            "📥 Import de vehículos: {} filas válidas, {} con errores",
            valid.len(),
            errors.len()
        );

        let mut success_count = 0usize;
        // Los batches se emiten secuencialmente, uno en vuelo a la vez
        for (batch_index, batch) in valid.chunks(BATCH_SIZE).enumerate() {
            match self.vehicles.insert_batch(batch).await {
                Ok(inserted) => success_count += inserted as usize,
                Err(e) => {
                    let first = batch_index * BATCH_SIZE + 1;
                    let last = batch_index * BATCH_SIZE + batch.len();
                    log::error!("❌ Batch {} de vehículos falló: {}", batch_index + 1, e);
                    errors.push(format!(
                        "Batch {} (records {}-{}): {}",
                        batch_index + 1,
                        first,
                        last,
                        e
                    ));
                }
            }
        }

        Ok(ImportReport {
            entity: ImportEntity::Vehicles,
            success_count,
            errors,
        })
    }

    /// Importar pasos de template desde texto CSV
    pub async fn import_task_templates(&self, text: &str) -> AppResult<ImportReport> {
        check_file_limits(text).map_err(AppError::BadRequest)?;

        let region_map = self.regions.code_map().await?;
        let rows = parse_csv(text);
        let (valid, mut errors) = validate_rows(&rows, |row| validate_template_row(row, &region_map));

        log::info!(
            "📥 Import de templates: {} filas válidas, {} con errores",
            valid.len(),
            errors.len()
        );

        let mut success_count = 0usize;
        for (batch_index, batch) in valid.chunks(BATCH_SIZE).enumerate() {
            match self.templates.insert_batch(batch).await {
                Ok(inserted) => success_count += inserted as usize,
                Err(e) => {
                    let first = batch_index * BATCH_SIZE + 1;
                    let last = batch_index * BATCH_SIZE + batch.len();
                    log::error!("❌ Batch {} de templates falló: {}", batch_index + 1, e);
                    errors.push(format!(
                        "Batch {} (records {}-{}): {}",
                        batch_index + 1,
                        first,
                        last,
                        e
                    ));
                }
            }
        }

        Ok(ImportReport {
            entity: ImportEntity::TaskTemplates,
            success_count,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEHICLE_HEADER: &str =
        "VehicleId,VIN,Plate,Make,Model,Year,Type,Region,Status,CommissioningTemplate,Odometer,FuelType,InServiceDate,PrimaryDepot,RadioId,LytxId,LastCHPInspection,NextCHPInspection";

    fn region_map() -> HashMap<String, Uuid> {
        let mut map = HashMap::new();
        map.insert("OC".to_string(), Uuid::new_v4());
        map
    }

    #[test]
    fn test_parse_csv_zips_headers() {
        let text = "A,B,C\n1,2,3\n4,5";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].get("A"), "1");
        assert_eq!(rows[0].get("C"), "3");
        // Las celdas que faltan cuentan como vacías
        assert_eq!(rows[1].get("C"), "");
    }

    #[test]
    fn test_parse_csv_skips_blank_lines() {
        let text = "A,B\n\n1,2\n   \n3,4\n";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("A"), "3");
    }

    #[test]
    fn test_parse_csv_sanitizes_cells() {
        let text = "A,B\n=SUM(A1),ok";
        let rows = parse_csv(text);
        assert_eq!(rows[0].get("A"), "'=SUM(A1)");
    }

    #[test]
    fn test_file_limits_row_ceiling() {
        let mut text = String::from("A,B\n");
        for i in 0..1001 {
            text.push_str(&format!("{},x\n", i));
        }
        let err = check_file_limits(&text).unwrap_err();
        assert!(err.contains("1001"));

        let mut ok_text = String::from("A,B\n");
        for i in 0..1000 {
            ok_text.push_str(&format!("{},x\n", i));
        }
        assert!(check_file_limits(&ok_text).is_ok());
    }

    #[test]
    fn test_valid_vehicle_row_imports() {
        let text = format!(
            "{}\nE450-1,1FDXE45P84HB12345,AMB-1,Ford,E-450,2023,ALS,OC,Draft,,,,,,,,,",
            VEHICLE_HEADER
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

        assert_eq!(valid.len(), 1);
        assert!(errors.is_empty());
        let record = &valid[0];
        assert_eq!(record.vehicle_id, "E450-1");
        assert_eq!(record.vin, "1FDXE45P84HB12345");
        assert_eq!(record.vehicle_type, VehicleType::Als);
        assert_eq!(record.status, VehicleStatus::Draft);
        assert!(record.region_id.is_some());
    }

    #[test]
    fn test_short_vin_rejected_with_row_label() {
        let text = format!(
            "{}\nE450-1,SHORT,AMB-1,Ford,E-450,2023,ALS,OC,Draft,,,,,,,,,",
            VEHICLE_HEADER
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

        assert!(valid.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Row 1: VIN:"));
        assert!(errors[0].contains("17 characters"));
    }

    #[test]
    fn test_bad_rows_do_not_stop_others() {
        let text = format!(
            "{}\n\
             E450-1,1FDXE45P84HB12345,,Ford,E-450,2023,ALS,OC,Draft,,,,,,,,,\n\
             E450-2,BAD,,Ford,E-450,2023,ALS,OC,Draft,,,,,,,,,\n\
             E450-3,1FDXE45P84HB12347,,Ford,E-450,1850,ALS,OC,Draft,,,,,,,,,\n\
             E450-4,1FDXE45P84HB12348,,Ford,E-450,2024,BLS,OC,Ready,,,,,,,,,",
            VEHICLE_HEADER
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

        // N=4, K=2 → válidas N−K, errores K
        assert_eq!(valid.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Row 2:"));
        assert!(errors[1].starts_with("Row 3: Year:"));
    }

    #[test]
    fn test_unknown_region_becomes_none() {
        let text = format!(
            "{}\nE450-1,1FDXE45P84HB12345,,Ford,E-450,2023,ALS,ZZ,Draft,,,,,,,,,",
            VEHICLE_HEADER
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

        assert!(errors.is_empty());
        assert_eq!(valid[0].region_id, None);
    }

    #[test]
    fn test_vehicle_defaults() {
        let text = format!(
            "{}\nE450-1,1FDXE45P84HB12345,,Ford,E-450,2023,,,,,,,,,,,,",
            VEHICLE_HEADER
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, _) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

        assert_eq!(valid[0].vehicle_type, VehicleType::Other);
        assert_eq!(valid[0].status, VehicleStatus::Draft);
        assert_eq!(valid[0].odometer, 0);
    }

    #[test]
    fn test_template_row_validation() {
        let header = "TemplateId,Name,Region,VehicleType,StepOrder,StepName,StepCategory,SLAHours,RequiresEvidence,RequiresApproval,EvidenceType,DependentStepId";
        let text = format!(
            "{}\nSTD-ALS,Standard ALS,OC,ALS,1,CHP Inspection,Compliance,48,True,True,photo,\n\
             STD-ALS,Standard ALS,OC,ALS,2,Decals,Branding,24,False,False,,CHP Inspection\n\
             STD-ALS,Standard ALS,OC,ALS,0,Bad Order,Branding,24,False,False,,",
            header
        );
        let rows = parse_csv(&text);
        let map = region_map();
        let (valid, errors) = validate_rows(&rows, |row| validate_template_row(row, &map));

        assert_eq!(valid.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Row 3: StepOrder:"));

        assert!(valid[0].requires_evidence);
        assert!(valid[0].requires_approval);
        assert_eq!(valid[1].dependent_step_id.as_deref(), Some("CHP Inspection"));
    }

    #[test]
    fn test_batch_partitioning() {
        let records: Vec<u32> = (0..250).collect();
        let sizes: Vec<usize> = records.chunks(BATCH_SIZE).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }
}
