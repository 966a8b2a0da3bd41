//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, JWT,
//! Smartsheet, email de invitaciones y los dos switches de despliegue
//! (modo de aplicación y modo de entrada).

use std::env;

/// Modo de aplicación: interno (staff) o demo (prospectos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Internal,
    Demo,
}

impl AppMode {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(AppMode::Internal),
            "demo" => Some(AppMode::Demo),
            _ => None,
        }
    }

    /// El alta pública de usuarios solo existe en modo demo
    pub fn public_signup_enabled(&self) -> bool {
        matches!(self, AppMode::Demo)
    }
}

/// Modo de entrada: qué árboles de rutas expone este despliegue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Landing,
    Internal,
    Demo,
}

impl EntryMode {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "landing" => Some(EntryMode::Landing),
            "internal" => Some(EntryMode::Internal),
            "demo" => Some(EntryMode::Demo),
            _ => None,
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origins: Vec<String>,
    pub app_mode: AppMode,
    pub entry_mode: EntryMode,
    // Origen público para los links de invitación
    pub app_origin: String,
    // Smartsheet
    pub smartsheet_base_url: String,
    pub smartsheet_api_key: Option<String>,
    // Resend (email de invitaciones)
    pub resend_api_key: Option<String>,
    pub invitation_from: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-super-secret-jwt-key-change-in-production".to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            app_mode: AppMode::parse_str(
                &env::var("APP_MODE").unwrap_or_else(|_| "internal".to_string()),
            )
            .expect("APP_MODE must be 'internal' or 'demo'"),
            entry_mode: EntryMode::parse_str(
                &env::var("ENTRY_MODE").unwrap_or_else(|_| "landing".to_string()),
            )
            .expect("ENTRY_MODE must be 'landing', 'internal' or 'demo'"),
            app_origin: env::var("APP_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            smartsheet_base_url: env::var("SMARTSHEET_BASE_URL")
                .unwrap_or_else(|_| "https://api.smartsheet.com/2.0".to_string()),
            smartsheet_api_key: env::var("SMARTSHEET_API_KEY").ok(),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            invitation_from: env::var("INVITATION_FROM")
                .unwrap_or_else(|_| "Fleet Command <onboarding@resend.dev>".to_string()),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
