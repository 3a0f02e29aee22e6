/*
 * Responsibility
 * - The request context handlers see after admission
 * - The gate builds it from verified claims and stores it in request extensions;
 *   handlers only receive this type
 */
use crate::error::AppError;
use crate::services::auth::{Claims, CredentialError};

/// Context attached to every admitted request.
///
/// - Public routes get an anonymous context (`authenticated == false`).
/// - `subject_id` is the `userId` claim of the verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub authenticated: bool,
    pub subject_id: Option<String>,
    pub is_admin: bool,
}

impl AuthCtx {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            subject_id: None,
            is_admin: false,
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            authenticated: true,
            subject_id: Some(claims.subject.clone()),
            is_admin: claims.is_admin,
        }
    }

    pub fn subject(&self) -> Result<&str, AppError> {
        self.subject_id
            .as_deref()
            .ok_or(AppError::Credential(CredentialError::MissingCredential))
    }

    /// Allow the owner of a resource, or any admin.
    pub fn ensure_self_or_admin(&self, owner: &str) -> Result<(), AppError> {
        if self.is_admin || self.subject()? == owner {
            Ok(())
        } else {
            Err(AppError::InsufficientPrivilege)
        }
    }
}

impl From<Option<Claims>> for AuthCtx {
    fn from(claims: Option<Claims>) -> Self {
        claims
            .as_ref()
            .map(Self::from_claims)
            .unwrap_or_else(Self::anonymous)
    }
}
