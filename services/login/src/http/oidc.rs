//! Discovery document and key set.

use crate::config::Config;
use crate::http::AppState;
use crate::jwks::Jwks;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// OpenID Provider metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryDocument {
    /// Issuer identifier.
    pub issuer: String,
    /// Advertised only; no authorize endpoint is served.
    pub authorization_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// Key set URL.
    pub jwks_uri: String,
    /// Userinfo endpoint URL.
    pub userinfo_endpoint: String,
    /// Supported response types.
    pub response_types_supported: Vec<String>,
    /// Supported subject types.
    pub subject_types_supported: Vec<String>,
    /// ID token signing algorithms.
    pub id_token_signing_alg_values_supported: Vec<String>,
    /// Supported scopes.
    pub scopes_supported: Vec<String>,
    /// Client authentication methods at the token endpoint.
    pub token_endpoint_auth_methods_supported: Vec<String>,
    /// Supported grant types.
    pub grant_types_supported: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl DiscoveryDocument {
    /// Metadata for the configured issuer.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let base = config.issuer_base();
        Self {
            issuer: base.to_string(),
            authorization_endpoint: format!("{base}/oauth2/authorize"),
            token_endpoint: format!("{base}/oauth2/token"),
            jwks_uri: format!("{base}/oidc/jwks"),
            userinfo_endpoint: format!("{base}/oauth2/userinfo"),
            response_types_supported: strings(&["token", "id_token", "none"]),
            subject_types_supported: strings(&["public"]),
            id_token_signing_alg_values_supported: vec![config.jwt_algorithm.as_str().to_string()],
            scopes_supported: strings(&["openid", "profile"]),
            token_endpoint_auth_methods_supported: strings(&["none"]),
            grant_types_supported: strings(&["password", "refresh_token"]),
        }
    }
}

/// `GET /.well-known/openid-configuration`.
pub async fn discovery_handler(State(state): State<AppState>) -> Json<DiscoveryDocument> {
    Json(DiscoveryDocument::from_config(state.engine.config()))
}

/// `GET /oidc/jwks`.
pub async fn jwks_handler(State(state): State<AppState>) -> impl IntoResponse {
    let jwks: Jwks = state.engine.jwks();
    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(jwks),
    )
}
