/*
 * Responsibility
 * - Router-level middleware, applied in app.rs (inner to outer):
 *   auth (admission gate) -> errors::catch_panics -> http -> errors (normalizer)
 *   -> security_headers -> cors
 */
pub mod auth;
pub mod cors;
pub mod errors;
pub mod http;
pub mod security_headers;
