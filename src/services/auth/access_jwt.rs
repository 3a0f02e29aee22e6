use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a presented credential was not accepted.
///
/// Each kind is logged separately; the client only sees the coarse
/// "authentication required" / "credential invalid" split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No `Authorization` header, a scheme other than `Bearer`, or an empty token.
    #[error("missing bearer credential")]
    MissingCredential,
    #[error("credential could not be decoded")]
    MalformedCredential,
    #[error("credential signature mismatch")]
    InvalidSignature,
    #[error("credential expired")]
    Expired,
}

impl CredentialError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
        }
    }
}

/// Identity claims carried by an access token.
///
/// Wire names follow the tokens minted by `POST /users/login`:
/// `{"userId", "isAdmin", "iat", "exp"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub subject: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl CredentialVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_token` against the caller's clock, before the signature.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            leeway_seconds: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Verify a raw `Authorization` header value and return the trusted claims.
    pub fn verify(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Claims, CredentialError> {
        let token = bearer_token(authorization)?;
        self.verify_token(token, now)
    }

    /// Order of checks: structure, expiry, signature. An elapsed token is reported as
    /// `Expired` whether or not its signature would verify.
    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CredentialError> {
        let unverified = decode_unverified(token)?;

        if unverified.exp.saturating_add(self.leeway_seconds) < now.timestamp() {
            return Err(CredentialError::Expired);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => CredentialError::InvalidSignature,
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::MalformedCredential,
            })?;

        Ok(data.claims)
    }
}

/// Extract the token from `Bearer <token>`. The scheme is matched case-insensitively
/// and any whitespace may separate it from the token.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, CredentialError> {
    let value = authorization.ok_or(CredentialError::MissingCredential)?;
    let (scheme, token) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(CredentialError::MissingCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(CredentialError::MissingCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::MissingCredential);
    }

    Ok(token)
}

// Reads header and claims without trusting them. Only used to reject early; the
// returned claims are never handed to callers.
fn decode_unverified(token: &str) -> Result<Claims, CredentialError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CredentialError::MalformedCredential);
    };

    let header =
        jsonwebtoken::decode_header(token).map_err(|_| CredentialError::MalformedCredential)?;
    if header.alg != Algorithm::HS256 {
        return Err(CredentialError::MalformedCredential);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| CredentialError::MalformedCredential)?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|_| CredentialError::MalformedCredential)?;

    if claims.subject.trim().is_empty() {
        return Err(CredentialError::MalformedCredential);
    }

    Ok(claims)
}
