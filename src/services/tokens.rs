//! Signed, time-limited identity tokens (HS256 JWT)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Identity, UserClaims},
};

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::days(config.token_ttl_days),
        }
    }

    /// Issue a token for the identity, valid from now
    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = UserClaims {
            sub: identity.id,
            role: identity.role,
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Check signature and expiry; a token is dead from its `exp` second onwards
    pub fn verify(&self, token: &str) -> AppResult<UserClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let claims = decode::<UserClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Authentication("Token has expired".to_string()),
                _ => AppError::Authentication("Invalid token".to_string()),
            })?
            .claims;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::Authentication("Token has expired".to_string()));
        }

        Ok(claims)
    }
}
