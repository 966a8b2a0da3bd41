//! Propiedades del pipeline de import CSV (sin base de datos)

use std::collections::HashMap;

use fleet_command::services::csv_import_service::{
    check_file_limits, parse_csv, validate_rows, validate_vehicle_row, BATCH_SIZE, MAX_DATA_ROWS,
};
use uuid::Uuid;

const HEADER: &str = "VehicleId,VIN,Plate,Make,Model,Year,Type,Region,Status,CommissioningTemplate,Odometer,FuelType,InServiceDate,PrimaryDepot,RadioId,LytxId,LastCHPInspection,NextCHPInspection";

fn region_map_with_oc() -> HashMap<String, Uuid> {
    let mut map = HashMap::new();
    map.insert("OC".to_string(), Uuid::new_v4());
    map
}

fn vehicle_line(id: usize, vin: &str, year: &str) -> String {
    format!("E450-{},{},AMB-{},Ford,E-450,{},ALS,OC,Draft,,,,,,,,,", id, vin, id, year)
}

#[test]
fn example_row_imports_cleanly() {
    // Escenario de referencia: una fila válida con región resoluble
    let text = format!(
        "{}\nE450-1,1FDXE45P84HB12345,AMB-1,Ford,E-450,2023,ALS,OC,Draft",
        HEADER
    );
    let map = region_map_with_oc();

    let rows = parse_csv(&text);
    let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

    assert_eq!(valid.len(), 1);
    assert!(errors.is_empty());
    assert_eq!(valid[0].vin, "1FDXE45P84HB12345");
    assert!(valid[0].region_id.is_some());
}

#[test]
fn short_vin_yields_single_error_mentioning_length() {
    let text = format!("{}\nE450-1,SHORT,AMB-1,Ford,E-450,2023,ALS,OC,Draft", HEADER);
    let map = region_map_with_oc();

    let rows = parse_csv(&text);
    let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

    assert_eq!(valid.len(), 0);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("VIN"));
    assert!(errors[0].contains("17 characters"));
}

#[test]
fn k_failures_among_n_rows_yield_n_minus_k_successes() {
    // 10 filas, 3 inválidas repartidas en posiciones distintas
    let map = region_map_with_oc();
    let mut text = String::from(HEADER);
    let bad_positions = [2usize, 5, 9];

    for i in 1..=10 {
        text.push('\n');
        if bad_positions.contains(&i) {
            // VIN corto
            text.push_str(&vehicle_line(i, "BADVIN", "2023"));
        } else {
            text.push_str(&vehicle_line(i, "1FDXE45P84HB12345", "2023"));
        }
    }

    let rows = parse_csv(&text);
    let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

    assert_eq!(valid.len(), 7);
    assert_eq!(errors.len(), 3);
    // Los errores conservan el número de fila 1-based sobre filas de datos
    assert!(errors[0].starts_with("Row 2:"));
    assert!(errors[1].starts_with("Row 5:"));
    assert!(errors[2].starts_with("Row 9:"));
}

#[test]
fn row_outcomes_are_order_independent() {
    let map = region_map_with_oc();

    // Inválida primero, válida después
    let text_a = format!(
        "{}\n{}\n{}",
        HEADER,
        vehicle_line(1, "BADVIN", "2023"),
        vehicle_line(2, "1FDXE45P84HB12345", "2023")
    );
    // Válida primero, inválida después
    let text_b = format!(
        "{}\n{}\n{}",
        HEADER,
        vehicle_line(1, "1FDXE45P84HB12345", "2023"),
        vehicle_line(2, "BADVIN", "2023")
    );

    let (valid_a, errors_a) =
        validate_rows(&parse_csv(&text_a), |row| validate_vehicle_row(row, &map));
    let (valid_b, errors_b) =
        validate_rows(&parse_csv(&text_b), |row| validate_vehicle_row(row, &map));

    assert_eq!(valid_a.len(), valid_b.len());
    assert_eq!(errors_a.len(), errors_b.len());
}

#[test]
fn file_over_row_ceiling_is_rejected_wholesale() {
    let mut text = String::from(HEADER);
    for i in 1..=(MAX_DATA_ROWS + 1) {
        text.push('\n');
        text.push_str(&vehicle_line(i, "1FDXE45P84HB12345", "2023"));
    }

    let err = check_file_limits(&text).unwrap_err();
    assert!(err.contains("1001"));
}

#[test]
fn file_over_size_ceiling_is_rejected() {
    // 5 MB + 1 byte de contenido
    let text = "x".repeat(5 * 1024 * 1024 + 1);
    let err = check_file_limits(&text).unwrap_err();
    assert!(err.contains("5 MB"));
}

#[test]
fn year_boundaries_are_inclusive() {
    let map = region_map_with_oc();
    for (year, ok) in [("1900", true), ("2100", true), ("1899", false), ("2101", false)] {
        let text = format!("{}\n{}", HEADER, vehicle_line(1, "1FDXE45P84HB12345", year));
        let rows = parse_csv(&text);
        let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));
        assert_eq!(valid.len() == 1 && errors.is_empty(), ok, "year {}", year);
    }
}

#[test]
fn unknown_region_is_no_region_not_an_error() {
    let map = region_map_with_oc();
    let text = format!(
        "{}\nE450-1,1FDXE45P84HB12345,AMB-1,Ford,E-450,2023,ALS,UNKNOWN,Draft",
        HEADER
    );

    let rows = parse_csv(&text);
    let (valid, errors) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

    assert!(errors.is_empty());
    assert_eq!(valid[0].region_id, None);
}

#[test]
fn formula_cells_are_neutralized_before_validation() {
    let map = region_map_with_oc();
    let text = format!(
        "{}\n=HYPERLINK(evil),1FDXE45P84HB12345,AMB-1,Ford,E-450,2023,ALS,OC,Draft",
        HEADER
    );

    let rows = parse_csv(&text);
    let (valid, _) = validate_rows(&rows, |row| validate_vehicle_row(row, &map));

    // La celda queda escapada con comilla, no interpretada
    assert_eq!(valid[0].vehicle_id, "'=HYPERLINK(evil)");
}

#[test]
fn valid_records_partition_into_bounded_batches() {
    let records: Vec<usize> = (0..1000).collect();
    let batches: Vec<&[usize]> = records.chunks(BATCH_SIZE).collect();

    assert_eq!(batches.len(), 10);
    assert!(batches.iter().all(|b| b.len() <= BATCH_SIZE));
    assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 1000);
}
