//! HTTP surface: axum router over a shared [`TokenEngine`].

pub mod error;
pub mod health;
pub mod oauth;
pub mod oidc;

use crate::engine::TokenEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ErrorBody;
pub use oauth::UserInfoResponse;
pub use oidc::DiscoveryDocument;

/// Handler state.
#[derive(Clone)]
pub struct AppState {
    /// Shared engine.
    pub engine: Arc<TokenEngine>,
}

impl AppState {
    /// Wrap an engine.
    #[must_use]
    pub fn new(engine: Arc<TokenEngine>) -> Self {
        Self { engine }
    }
}

/// Build the service router.
pub fn router(engine: Arc<TokenEngine>) -> Router {
    Router::new()
        .route("/oauth2/token", post(oauth::token_handler))
        .route("/oauth2/userinfo", get(oauth::userinfo_handler))
        .route("/oidc/jwks", get(oidc::jwks_handler))
        .route(
            "/.well-known/openid-configuration",
            get(oidc::discovery_handler),
        )
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(engine))
}
