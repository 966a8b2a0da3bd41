//! Servicio JWT
//!
//! Tokens HS256 de acceso y refresh con los claims de identidad de la
//! flota: rol y tenant viajan en el token y se re-verifican en cada
//! request por el middleware.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::{AppRole, AuthUser, JwtClaims, TenantType};
use crate::utils::errors::AppError;
use uuid::Uuid;

/// Configuración JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
}

impl JwtConfig {
    pub fn new(secret: String, access_hours: i64) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(access_hours),
            refresh_token_duration: Duration::days(7),
        }
    }
}

/// Servicio JWT
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, access_hours: i64) -> Self {
        let config = JwtConfig::new(secret.to_string(), access_hours);
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn claims_for(&self, user: &AuthUser, duration: Duration) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            tenant_type: user.tenant_type.as_str().to_string(),
            exp: (now + duration).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Genera un token de acceso
    pub fn generate_access_token(&self, user: &AuthUser) -> Result<String, AppError> {
        let claims = self.claims_for(user, self.config.access_token_duration);

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generating access token: {}", e)))
    }

    /// Genera un token de refresh
    pub fn generate_refresh_token(&self, user: &AuthUser) -> Result<String, AppError> {
        let claims = self.claims_for(user, self.config.refresh_token_duration);

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generating refresh token: {}", e)))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let validation = Validation::new(self.config.algorithm);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))
    }

    /// Reconstruye la identidad tipada desde los claims
    pub fn user_from_claims(&self, claims: &JwtClaims) -> Result<AuthUser, AppError> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Invalid subject in token".to_string()))?;
        let role = AppRole::parse_str(&claims.role)
            .ok_or_else(|| AppError::Jwt("Invalid role in token".to_string()))?;
        let tenant_type = TenantType::parse_str(&claims.tenant_type)
            .ok_or_else(|| AppError::Jwt("Invalid tenant in token".to_string()))?;

        Ok(AuthUser {
            id,
            email: claims.email.clone(),
            role,
            tenant_type,
        })
    }

    /// Valida un token y devuelve la identidad tipada
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = self.validate_token(token)?;
        self.user_from_claims(&claims)
    }

    /// Refresca un access token a partir de un refresh token válido
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        let user = self.authenticate(refresh_token)?;
        self.generate_access_token(&user)
    }

    /// Expiración del access token generado ahora
    pub fn access_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + self.config.access_token_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "supervisor@fleet.example.com".to_string(),
            role: AppRole::Supervisor,
            tenant_type: TenantType::Internal,
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = JwtService::new("test-secret", 24);
        let user = test_user();

        let token = jwt_service.generate_access_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "supervisor@fleet.example.com");
        assert_eq!(claims.role, "supervisor");
        assert_eq!(claims.tenant_type, "internal");
    }

    #[test]
    fn test_authenticate_round_trip() {
        let jwt_service = JwtService::new("test-secret", 24);
        let user = test_user();

        let token = jwt_service.generate_access_token(&user).unwrap();
        let decoded = jwt_service.authenticate(&token).unwrap();

        assert_eq!(decoded.id, user.id);
        assert_eq!(decoded.role, AppRole::Supervisor);
        assert_eq!(decoded.tenant_type, TenantType::Internal);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt_service = JwtService::new("test-secret", 24);
        let other_service = JwtService::new("other-secret", 24);
        let user = test_user();

        let token = jwt_service.generate_access_token(&user).unwrap();
        assert!(other_service.validate_token(&token).is_err());
    }

    #[test]
    fn test_refresh_generates_new_access_token() {
        let jwt_service = JwtService::new("test-secret", 24);
        let user = test_user();

        let refresh = jwt_service.generate_refresh_token(&user).unwrap();
        let access = jwt_service.refresh_access_token(&refresh).unwrap();
        let decoded = jwt_service.authenticate(&access).unwrap();
        assert_eq!(decoded.email, user.email);
    }
}
