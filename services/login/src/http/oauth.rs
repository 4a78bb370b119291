//! Token and userinfo endpoints.

use crate::error::TokenError;
use crate::grant::TokenRequestParams;
use crate::http::AppState;
use crate::issuer::TokenResponse;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `POST /oauth2/token`.
///
/// # Errors
///
/// The OAuth error for the rejected grant.
pub async fn token_handler(
    State(state): State<AppState>,
    body: Result<Json<TokenRequestParams>, JsonRejection>,
) -> Result<Json<TokenResponse>, TokenError> {
    let Json(params) = body.map_err(|e| {
        debug!(error = %e, "Rejected token request body");
        TokenError::invalid_request("request body must be a JSON object")
    })?;

    let response = state.engine.processor().process_grant(params)?;
    Ok(Json(response))
}

/// Query parameters accepted by the userinfo endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UserInfoQuery {
    /// Fallback when no `Authorization` header is sent.
    pub access_token: Option<String>,
}

/// OIDC userinfo body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfoResponse {
    /// Subject.
    pub sub: String,
    /// Username.
    pub preferred_username: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserInfoResponse {
    /// Claims for a username subject.
    #[must_use]
    pub fn for_subject(subject: &str) -> Self {
        Self {
            sub: subject.to_string(),
            preferred_username: subject.to_string(),
            name: Some(display_name(subject)),
        }
    }
}

/// `GET /oauth2/userinfo`.
///
/// # Errors
///
/// `invalid_request` without a token, `invalid_token` for a bad or expired one.
pub async fn userinfo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserInfoQuery>,
) -> Result<Json<UserInfoResponse>, TokenError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let subject = state
        .engine
        .validator()
        .resolve_subject(authorization, query.access_token.as_deref())?;

    Ok(Json(UserInfoResponse::for_subject(&subject)))
}

// "alice" -> "Alice", "bOB" -> "Bob"
fn display_name(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("alice"), "Alice");
        assert_eq!(display_name("bOB"), "Bob");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_userinfo_for_subject() {
        let info = UserInfoResponse::for_subject("alice");
        assert_eq!(info.sub, "alice");
        assert_eq!(info.preferred_username, "alice");
        assert_eq!(info.name.as_deref(), Some("Alice"));
    }
}
