//! Admission gate middleware: classify the request, verify the bearer
//! credential, authorize, then hand an `AuthCtx` to the handler.
//!
//! A rejected request never reaches `next`, so no handler side effect can
//! happen for it. The request body is not touched.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};
use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AdmissionDecision;
use crate::state::AppState;

/// Put the admission gate in front of every route of `router`.
///
/// Apply it to the fully assembled router so the classifier sees the whole
/// path (prefix included) and unmatched paths are guarded as well.
pub fn apply(router: Router, state: AppState) -> Router {
    router.layer(middleware::from_fn_with_state(state, admission_middleware))
}

async fn admission_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let decision = state.gate.admit(
        req.method(),
        req.uri().path(),
        req.headers().get(header::AUTHORIZATION),
        Utc::now(),
    );

    match decision {
        AdmissionDecision::Allow { level, claims } => {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                ?level,
                subject = claims.as_ref().map(|c| c.subject.as_str()),
                "request admitted"
            );

            // middleware -> extractor
            req.extensions_mut().insert(AuthCtx::from(claims));
            Ok(next.run(req).await)
        }
        AdmissionDecision::Reject { level, reason } => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                ?level,
                reason = reason.kind(),
                "request rejected"
            );
            Err(reason.into())
        }
    }
}
