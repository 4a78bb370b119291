//! Login Service library.
//!
//! OAuth2 password and refresh-token grants with OIDC ID tokens: signs
//! access/ID tokens with a symmetric key, rotates single-use refresh tokens
//! through an in-memory ledger, and validates bearer tokens for the
//! userinfo endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bearer;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod grant;
pub mod http;
pub mod issuer;
pub mod jwks;
pub mod jwt;
pub mod metrics;
pub mod refresh;
pub mod registry;
pub mod telemetry;

// Re-exports for convenience
pub use config::Config;
pub use engine::TokenEngine;
pub use error::TokenError;
