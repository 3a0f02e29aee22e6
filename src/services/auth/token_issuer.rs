use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tracing::error;

use crate::error::AppError;
use crate::services::auth::access_jwt::Claims;

/// Signs HS256 access tokens with the server secret.
#[derive(Clone)]
pub struct TokenIssuer {
    ttl_seconds: u64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(
        &self,
        subject: &str,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);

        let claims = Claims {
            subject: subject.to_string(),
            is_admin,
            iat,
            exp: iat.saturating_add(ttl),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::unexpected(e)
        })
    }
}
