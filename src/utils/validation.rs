//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de la flota: VIN, años, emails, passwords y celdas CSV.
//! Todas son funciones puras que devuelven el valor normalizado
//! o un `ValidationError` con mensaje legible.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

lazy_static! {
    // Alfabeto VIN: alfanumérico sin I, O, Q
    static ref VIN_RE: Regex = Regex::new(r"(?i)^[A-HJ-NPR-Z0-9]+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Rango de años aceptado para vehículos
pub const YEAR_MIN: i32 = 1900;
pub const YEAR_MAX: i32 = 2100;

fn error_with_message(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar y normalizar un VIN
///
/// Exactamente 17 caracteres del alfabeto permitido (sin I/O/Q),
/// insensible a mayúsculas. Devuelve el VIN normalizado en mayúsculas.
pub fn validate_vin(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() != 17 {
        let mut error = error_with_message("vin", "VIN must be exactly 17 characters".to_string());
        error.add_param("length".into(), &trimmed.chars().count());
        return Err(error);
    }
    if !VIN_RE.is_match(trimmed) {
        return Err(error_with_message(
            "vin",
            "VIN contains invalid characters (I, O, Q not allowed)".to_string(),
        ));
    }
    Ok(trimmed.to_uppercase())
}

/// Validar año de vehículo en [1900, 2100]
pub fn validate_year(value: i32) -> Result<(), ValidationError> {
    if value < YEAR_MIN || value > YEAR_MAX {
        let mut error = error_with_message(
            "year",
            format!("Year must be between {} and {}", YEAR_MIN, YEAR_MAX),
        );
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email (máximo 255 caracteres)
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > 255 {
        return Err(error_with_message(
            "email",
            "Email must be less than 255 characters".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err(error_with_message("email", "Invalid email address".to_string()));
    }
    Ok(())
}

/// Validar password según la política de seguridad
///
/// Mínimo 8 caracteres, al menos una mayúscula, una minúscula,
/// un dígito y un símbolo.
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 8 {
        return Err(error_with_message(
            "password",
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(error_with_message(
            "password",
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(error_with_message(
            "password",
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(error_with_message(
            "password",
            "Password must contain at least one number".to_string(),
        ));
    }
    if value.chars().all(|c| c.is_alphanumeric()) {
        return Err(error_with_message(
            "password",
            "Password must contain at least one special character".to_string(),
        ));
    }
    Ok(())
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let mut error = error_with_message("uuid", "Invalid ID format".to_string());
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = error_with_message("date", "Invalid date, expected YYYY-MM-DD".to_string());
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar texto corto requerido (nombres, identificadores)
///
/// Recorta espacios; rechaza vacío y excesos de longitud.
pub fn validate_short_text(value: &str, field: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error_with_message("required", format!("{} is required", field)));
    }
    if trimmed.chars().count() > max {
        return Err(error_with_message(
            "length",
            format!("{} must be less than {} characters", field, max),
        ));
    }
    Ok(trimmed.to_string())
}

/// Sanitizar celda CSV para neutralizar inyección de fórmulas
///
/// Las celdas que empiezan con `=`, `+`, `-` o `@` se prefijan con
/// comilla simple antes de cualquier validación.
pub fn sanitize_csv_cell(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with('=')
        || trimmed.starts_with('+')
        || trimmed.starts_with('-')
        || trimmed.starts_with('@')
    {
        format!("'{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Mensaje legible de un ValidationError
pub fn error_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vin_normalizes_uppercase() {
        let vin = validate_vin("1fdxe45p84hb12345").unwrap();
        assert_eq!(vin, "1FDXE45P84HB12345");
    }

    #[test]
    fn test_validate_vin_rejects_wrong_length() {
        assert!(validate_vin("SHORT").is_err());
        assert!(validate_vin(&"A".repeat(18)).is_err());
        assert!(validate_vin("").is_err());
    }

    #[test]
    fn test_validate_vin_rejects_forbidden_letters() {
        // I, O y Q están fuera del alfabeto VIN
        assert!(validate_vin("1FDXE45P84HB1234I").is_err());
        assert!(validate_vin("1FDXE45P84HB1234O").is_err());
        assert!(validate_vin("1FDXE45P84HB1234Q").is_err());
    }

    #[test]
    fn test_validate_vin_accepts_whitespace_padding() {
        assert!(validate_vin("  1FDXE45P84HB12345  ").is_ok());
    }

    #[test]
    fn test_validate_year_boundaries() {
        assert!(validate_year(1900).is_ok());
        assert!(validate_year(2100).is_ok());
        assert!(validate_year(1899).is_err());
        assert!(validate_year(2101).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("tech@fleet.example.com").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("test@").is_err());
        let long_local = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long_local).is_err());
    }

    #[test]
    fn test_validate_password_policy() {
        assert!(validate_password("Passw0rd!").is_ok());
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSymbols123").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("invalid-uuid").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_short_text() {
        assert_eq!(validate_short_text("  E450-1  ", "Vehicle ID", 50).unwrap(), "E450-1");
        assert!(validate_short_text("   ", "Vehicle ID", 50).is_err());
        assert!(validate_short_text(&"x".repeat(51), "Vehicle ID", 50).is_err());
    }

    #[test]
    fn test_sanitize_csv_cell_escapes_formula_prefixes() {
        assert_eq!(sanitize_csv_cell("=SUM(A1:A9)"), "'=SUM(A1:A9)");
        assert_eq!(sanitize_csv_cell("+1234"), "'+1234");
        assert_eq!(sanitize_csv_cell("-cmd"), "'-cmd");
        assert_eq!(sanitize_csv_cell("@import"), "'@import");
        assert_eq!(sanitize_csv_cell("  Ford "), "Ford");
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(24).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }
}
