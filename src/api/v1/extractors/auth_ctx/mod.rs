/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the request context (AuthCtx) the admission gate attached
 * - axum-specific code lives in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
