/*
 * Responsibility
 * - Application-wide AppError: the single place a failure becomes an HTTP response
 * - IntoResponse (status / stable JSON body); internals are logged, never echoed
 * - Conversions from admission, storage and framework failures
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::{CredentialError, RejectReason};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Response extension set on every response built from `AppError`.
///
/// The fallback normalizer leaves marked responses alone, so a request never
/// gets its error body produced twice.
#[derive(Debug, Clone, Copy)]
pub struct Normalized;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("credential rejected: {0}")]
    Credential(CredentialError),
    #[error("insufficient privilege")]
    InsufficientPrivilege,
    #[error("{code}: {message}")]
    Validation {
        code: &'static str,
        message: String,
        details: Option<serde_json::Value>,
    },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("request timed out")]
    Timeout,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with(
        code: &'static str,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected(err.into())
    }

    /// Error for a response the framework produced on its own (extractor
    /// rejections, unmatched routes, layer failures). Only the status is known.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Credential(CredentialError::MissingCredential),
            StatusCode::FORBIDDEN => Self::InsufficientPrivilege,
            StatusCode::NOT_FOUND => Self::not_found("resource"),
            StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed,
            StatusCode::CONFLICT => Self::conflict("conflict"),
            StatusCode::REQUEST_TIMEOUT => Self::Timeout,
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            s if s.is_client_error() => Self::validation("INVALID_REQUEST", "invalid request"),
            s => Self::Unexpected(anyhow::anyhow!("unhandled error response with status {s}")),
        }
    }

    /// Status, stable code, client-visible message and optional details.
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::Credential(CredentialError::MissingCredential) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_REQUIRED",
                "authentication required".into(),
                None,
            ),
            AppError::Credential(CredentialError::Expired) => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_EXPIRED",
                "credential invalid".into(),
                None,
            ),
            AppError::Credential(
                CredentialError::MalformedCredential | CredentialError::InvalidSignature,
            ) => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_INVALID",
                "credential invalid".into(),
                None,
            ),
            AppError::InsufficientPrivilege => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_PRIVILEGE",
                "insufficient privilege".into(),
                None,
            ),
            AppError::Validation {
                code,
                message,
                details,
            } => (StatusCode::BAD_REQUEST, *code, message.clone(), details.clone()),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "resource not found".into(),
                Some(serde_json::json!({ "resource": resource })),
            ),
            AppError::Conflict { message } => {
                (StatusCode::CONFLICT, "CONFLICT", message.clone(), None)
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "method not allowed".into(),
                None,
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "payload too large".into(),
                None,
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "TIMEOUT",
                "request timed out".into(),
                None,
            ),
            AppError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal error".into(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unexpected(err) = &self {
            tracing::error!(error = ?err, "unexpected failure");
        }

        let (status, code, message, details) = self.parts();
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };

        let mut res = (status, Json(body)).into_response();
        res.extensions_mut().insert(Normalized);
        res
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        AppError::Credential(e)
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Credential(e) => AppError::Credential(e),
            RejectReason::InsufficientPrivilege => AppError::InsufficientPrivilege,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Duplicate { field } => {
                AppError::conflict(format!("{field} is already in use"))
            }
            RepoError::Poisoned { .. } => AppError::unexpected(e),
        }
    }
}
