pub mod password;
pub mod role;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SessionConfig;
pub use role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret is not configured")]
    InvalidSecret,

    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Session expired")]
    Expired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

/// Signs and verifies session tokens with the configured secret
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").field("expiry_hours", &self.expiry_hours).finish_non_exhaustive()
    }
}

/// The staff member behind a verified session, attached to editor requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        Self { id: claims.sub, username: claims.username.clone(), role: claims.role }
    }
}

/// A freshly issued session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub max_age_secs: i64,
}

impl SessionKeys {
    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        if config.secret.trim().is_empty() {
            return Err(SessionError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry_hours: config.expiry_hours,
        })
    }

    pub fn issue(&self, user_id: Uuid, username: &str, role: Role) -> Result<IssuedSession, SessionError> {
        let now = Utc::now();
        let max_age = Duration::hours(self.expiry_hours as i64);
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role,
            exp: (now + max_age).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))?;

        Ok(IssuedSession {
            token,
            expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(now + max_age),
            max_age_secs: max_age.num_seconds(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::InvalidToken(e.to_string()),
            })
    }
}
