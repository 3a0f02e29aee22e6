use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::CredentialError;

use super::AuthCtx;

/// Extractor handing the admission gate's AuthCtx to a handler.
/// Assumes the gate middleware inserted it into request extensions; a request
/// that bypassed the gate is treated as unauthenticated.
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Credential(CredentialError::MissingCredential))
    }
}
