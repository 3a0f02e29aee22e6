//! Terminal failure handling.
//!
//! - `apply`: rewrites error responses the framework produced without going
//!   through `AppError` (unmatched route, 405, extractor rejections, body limit)
//!   into the normalized JSON shape. Responses already built by `AppError` are
//!   passed through untouched.
//! - `catch_panics`: a panicking handler becomes a normalized 500; the panic
//!   payload is logged, never returned.

use std::any::Any;

use axum::{
    Router,
    http::header,
    middleware,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{AppError, Normalized};

pub fn apply(router: Router) -> Router {
    router.layer(middleware::map_response(normalize_response))
}

pub fn catch_panics(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

pub async fn normalize_response(res: Response) -> Response {
    let status = res.status();
    if res.extensions().get::<Normalized>().is_some()
        || !(status.is_client_error() || status.is_server_error())
    {
        return res;
    }

    tracing::debug!(%status, "normalizing framework error response");

    let (mut parts, _) = res.into_parts();
    let (normalized, body) = AppError::from_status(status).into_response().into_parts();

    // Keep headers such as `allow` on 405; only the body and its framing change.
    parts.status = normalized.status;
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.extend(normalized.headers);
    parts.extensions.insert(Normalized);

    Response::from_parts(parts, body)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    };

    AppError::unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
