//! Bearer token validation for resource endpoints.
//!
//! Only consults the signing authority; access tokens are self-contained.

use crate::error::TokenError;
use crate::jwt::{SigningAuthority, TokenClaims, TokenKind, VerifyError};
use crate::metrics;
use std::sync::Arc;
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Pick the presented token: a `Bearer` authorization header wins over the
/// `access_token` query parameter.
///
/// # Errors
///
/// [`TokenError::MissingToken`] when neither source carries a token.
pub fn extract_token<'a>(
    authorization: Option<&'a str>,
    query_token: Option<&'a str>,
) -> Result<&'a str, TokenError> {
    let from_header = authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    from_header
        .or_else(|| query_token.map(str::trim).filter(|token| !token.is_empty()))
        .ok_or(TokenError::MissingToken)
}

/// Resolves the subject of a presented access token.
pub struct BearerValidator {
    authority: Arc<SigningAuthority>,
}

impl BearerValidator {
    /// Create a validator backed by `authority`.
    #[must_use]
    pub fn new(authority: Arc<SigningAuthority>) -> Self {
        Self { authority }
    }

    /// Resolve the subject from request credentials.
    ///
    /// # Errors
    ///
    /// `MissingToken`, `InvalidToken`, or `Expired`.
    pub fn resolve_subject(
        &self,
        authorization: Option<&str>,
        query_token: Option<&str>,
    ) -> Result<String, TokenError> {
        let token = extract_token(authorization, query_token).inspect_err(|_| {
            metrics::record_bearer_validation("missing");
        })?;
        self.validate(token).map(|claims| claims.sub)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    ///
    /// `InvalidToken` or `Expired`.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = match self.authority.verify_kind(token, TokenKind::Access) {
            Ok(claims) => claims,
            Err(e) => {
                let status = match e {
                    VerifyError::Expired => "expired",
                    VerifyError::InvalidSignature | VerifyError::Malformed(_) => "invalid",
                };
                metrics::record_bearer_validation(status);
                debug!(error = %e, "Bearer token rejected");
                return Err(e.into());
            }
        };

        if claims.sub.is_empty() {
            metrics::record_bearer_validation("invalid");
            return Err(TokenError::InvalidToken);
        }

        metrics::record_bearer_validation("success");
        Ok(claims)
    }
}
