//! Admin authentication: credential checks and bearer-token issuance.
//!
//! [`credentials::CredentialVerifier`] decides who may log in;
//! [`token::TokenService`] signs and verifies the resulting bearer tokens.

pub mod credentials;
pub mod token;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use token::{TokenError, TokenService};
