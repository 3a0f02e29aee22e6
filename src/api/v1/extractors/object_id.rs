/*
 * Responsibility
 * - Parse a `{id}` path segment into a document id (UUID)
 * - A malformed id is a validation failure (400), never a lookup
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(pub Uuid);

impl<S> FromRequestParts<S> for ObjectId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("INVALID_ID", "invalid id"))?;

        parse_object_id(&raw).map(ObjectId)
    }
}

pub fn parse_object_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("INVALID_ID", "invalid id"))
}
