/// Factory: build the process-wide auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AdmissionGate, CredentialVerifier, RouteTable, TokenIssuer};

pub fn build_admission_gate(config: &Config) -> Arc<AdmissionGate> {
    let verifier =
        CredentialVerifier::new(&config.jwt_secret, config.access_token_leeway_seconds);
    let routes = RouteTable::catalog(&config.api_prefix);

    Arc::new(AdmissionGate::new(routes, verifier))
}

pub fn build_token_issuer(config: &Config) -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(
        &config.jwt_secret,
        config.access_token_ttl_seconds,
    ))
}
