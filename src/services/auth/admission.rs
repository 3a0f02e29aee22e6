//! Admission decision for one request: classify, verify, authorize.
//!
//! Per request the gate moves `Unclassified -> Classified -> {Admitted, Rejected}`.
//! Both end states are terminal and the decision is dropped with the request.

use axum::http::{HeaderValue, Method};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::access_jwt::{Claims, CredentialError, CredentialVerifier};
use super::route_rules::{AccessLevel, RouteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("insufficient privilege")]
    InsufficientPrivilege,
}

impl RejectReason {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Credential(e) => e.kind(),
            Self::InsufficientPrivilege => "insufficient_privilege",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// `claims` is `None` only for public routes.
    Allow {
        level: AccessLevel,
        claims: Option<Claims>,
    },
    Reject {
        level: AccessLevel,
        reason: RejectReason,
    },
}

impl AdmissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

/// Process-wide admission policy: the route table plus the credential verifier.
/// Immutable after construction; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    routes: RouteTable,
    verifier: CredentialVerifier,
}

impl AdmissionGate {
    pub fn new(routes: RouteTable, verifier: CredentialVerifier) -> Self {
        Self { routes, verifier }
    }

    pub fn admit(
        &self,
        method: &Method,
        path: &str,
        authorization: Option<&HeaderValue>,
        now: DateTime<Utc>,
    ) -> AdmissionDecision {
        let level = self.routes.classify(method, path);

        if level == AccessLevel::Public {
            // Public routes never look at the header, even a broken one.
            return AdmissionDecision::Allow {
                level,
                claims: None,
            };
        }

        // Header bytes that are not visible ASCII cannot carry a bearer token.
        let verified = authorization
            .map(HeaderValue::to_str)
            .transpose()
            .map_err(|_| CredentialError::MalformedCredential)
            .and_then(|value| self.verifier.verify(value, now));

        let claims = match verified {
            Ok(claims) => claims,
            Err(e) => {
                return AdmissionDecision::Reject {
                    level,
                    reason: e.into(),
                };
            }
        };

        if level == AccessLevel::AuthenticatedAdmin && !claims.is_admin {
            return AdmissionDecision::Reject {
                level,
                reason: RejectReason::InsufficientPrivilege,
            };
        }

        AdmissionDecision::Allow {
            level,
            claims: Some(claims),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::services::auth::access_jwt::test_tokens::{SECRET, mint, valid};

    fn gate() -> AdmissionGate {
        AdmissionGate::new(
            RouteTable::catalog("/api/v1"),
            CredentialVerifier::new(SECRET, 0),
        )
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    fn reject_reason(decision: AdmissionDecision) -> RejectReason {
        match decision {
            AdmissionDecision::Reject { reason, .. } => reason,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn public_route_allows_without_credential() {
        let d = gate().admit(&Method::GET, "/api/v1/categories", None, Utc::now());
        assert_eq!(
            d,
            AdmissionDecision::Allow {
                level: AccessLevel::Public,
                claims: None
            }
        );
    }

    #[test]
    fn public_route_ignores_broken_header() {
        let junk = HeaderValue::from_static("Bearer junk");
        let d = gate().admit(&Method::GET, "/api/v1/products/1", Some(&junk), Utc::now());
        assert!(d.is_allowed());
    }

    #[test]
    fn protected_routes_require_credential() {
        let g = gate();
        for (method, path) in [
            (Method::PUT, "/api/v1/users/42"),
            (Method::POST, "/api/v1/products"),
            (Method::DELETE, "/api/v1/orders/7"),
            (Method::GET, "/api/v1/not-a-route"),
        ] {
            let d = g.admit(&method, path, None, Utc::now());
            assert_eq!(
                reject_reason(d),
                RejectReason::Credential(CredentialError::MissingCredential),
                "{method} {path}"
            );
        }
    }

    #[test]
    fn authenticated_route_attaches_claims() {
        let header = bearer(&valid("user-42", false));
        let d = gate().admit(&Method::PUT, "/api/v1/users/42", Some(&header), Utc::now());
        match d {
            AdmissionDecision::Allow {
                level,
                claims: Some(claims),
            } => {
                assert_eq!(level, AccessLevel::Authenticated);
                assert_eq!(claims.subject, "user-42");
            }
            other => panic!("expected allow with claims, got {other:?}"),
        }
    }

    #[test]
    fn admin_route_rejects_non_admin() {
        let header = bearer(&valid("user-1", false));
        let d = gate().admit(&Method::POST, "/api/v1/products", Some(&header), Utc::now());
        assert_eq!(reject_reason(d), RejectReason::InsufficientPrivilege);
    }

    #[test]
    fn admin_route_allows_admin() {
        let header = bearer(&valid("admin-1", true));
        let d = gate().admit(&Method::POST, "/api/v1/products", Some(&header), Utc::now());
        assert!(d.is_allowed());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let header = bearer(&mint(SECRET, "user-42", true, Duration::hours(-1)));
        let d = gate().admit(&Method::PUT, "/api/v1/users/42", Some(&header), Utc::now());
        assert_eq!(reject_reason(d), RejectReason::Credential(CredentialError::Expired));
    }

    #[test]
    fn wrong_scheme_is_missing_credential() {
        let header = HeaderValue::from_static("Token abc");
        let d = gate().admit(&Method::DELETE, "/api/v1/orders/7", Some(&header), Utc::now());
        assert_eq!(
            reject_reason(d),
            RejectReason::Credential(CredentialError::MissingCredential)
        );
    }

    #[test]
    fn non_ascii_header_is_ignored_on_public_route() {
        let header = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        let d = gate().admit(&Method::GET, "/api/v1/categories", Some(&header), Utc::now());
        assert!(d.is_allowed());
    }

    #[test]
    fn non_ascii_header_is_malformed_on_protected_route() {
        let header = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        let d = gate().admit(&Method::GET, "/api/v1/orders/7", Some(&header), Utc::now());
        assert_eq!(
            reject_reason(d),
            RejectReason::Credential(CredentialError::MalformedCredential)
        );
    }

    #[test]
    fn credential_failure_precedes_privilege_check() {
        let header = bearer(&mint("another-secret", "admin", true, Duration::minutes(5)));
        let d = gate().admit(&Method::DELETE, "/api/v1/products/1", Some(&header), Utc::now());
        assert_eq!(
            reject_reason(d),
            RejectReason::Credential(CredentialError::InvalidSignature)
        );
    }
}
