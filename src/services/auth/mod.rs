pub mod access_jwt;
pub mod admission;
pub mod factory;
pub mod password;
pub mod route_rules;
pub mod token_issuer;

pub use access_jwt::{Claims, CredentialError, CredentialVerifier};
pub use admission::{AdmissionDecision, AdmissionGate, RejectReason};
pub use factory::{build_admission_gate, build_token_issuer};
pub use route_rules::RouteTable;
pub use token_issuer::TokenIssuer;
