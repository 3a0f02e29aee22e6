/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - gate: admission policy (route rules + verifier), read-only after startup
 *   - tokens: access-token issuer for login
 *   - store: document collections
 * - Cloned per request (everything inside is behind an Arc)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::repos::Store;
use crate::services::auth::{AdmissionGate, TokenIssuer, build_admission_gate, build_token_issuer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AdmissionGate>,
    pub tokens: Arc<TokenIssuer>,
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(gate: Arc<AdmissionGate>, tokens: Arc<TokenIssuer>, store: Arc<Store>) -> Self {
        Self {
            gate,
            tokens,
            store,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            build_admission_gate(config),
            build_token_issuer(config),
            Arc::new(Store::new()),
        )
    }
}
