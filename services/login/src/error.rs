//! Error types for the token lifecycle engine.
//!
//! Every variant is recoverable by the caller. The HTTP layer maps them to
//! OAuth 2.0 error codes and 4xx/5xx statuses via [`TokenError::error_code`]
//! and [`TokenError::status_code`].

use crate::jwt::VerifyError;
use crate::refresh::LedgerError;
use thiserror::Error;

/// Errors surfaced by grant processing and bearer validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// `client_id` missing or not registered.
    #[error("Unknown or missing client_id")]
    UnknownClient,

    /// Username/password pair did not match a registered credential.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// `grant_type` missing or not one of the supported grants.
    #[error("Unsupported grant_type: {0}")]
    UnsupportedGrant(String),

    /// Refresh token unknown, already rotated, expired, or bound to another client.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Grant request is missing a parameter its grant type requires.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No bearer token in the authorization header or query.
    #[error("Missing or invalid access token")]
    MissingToken,

    /// Signature, structure, issuer, or kind check failed.
    #[error("Invalid token")]
    InvalidToken,

    /// Token is past its `exp` claim.
    #[error("Token expired")]
    Expired,

    /// Refresh token id collided with a live or retired ledger entry.
    #[error("Refresh token id conflict")]
    Conflict,

    /// Token could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// OAuth 2.0 error code (RFC 6749 §5.2, RFC 6750 §3.1).
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownClient => "invalid_client",
            Self::InvalidCredentials | Self::InvalidRefreshToken => "invalid_grant",
            Self::UnsupportedGrant(_) => "unsupported_grant_type",
            Self::InvalidRequest(_) | Self::MissingToken => "invalid_request",
            Self::InvalidToken | Self::Expired => "invalid_token",
            Self::Conflict | Self::Signing(_) | Self::Config(_) => "server_error",
        }
    }

    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownClient | Self::UnsupportedGrant(_) | Self::InvalidRequest(_) => 400,
            Self::InvalidCredentials
            | Self::InvalidRefreshToken
            | Self::MissingToken
            | Self::InvalidToken
            | Self::Expired => 401,
            Self::Conflict => 409,
            Self::Signing(_) | Self::Config(_) => 500,
        }
    }

    /// Client-facing description. Internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Signing(_) | Self::Config(_) => "Internal server error".to_string(),
            Self::Expired => "Token expired".to_string(),
            Self::InvalidToken => "Invalid or expired access token".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<VerifyError> for TokenError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Expired => Self::Expired,
            VerifyError::InvalidSignature | VerifyError::Malformed(_) => Self::InvalidToken,
        }
    }
}

impl From<LedgerError> for TokenError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound | LedgerError::Expired => Self::InvalidRefreshToken,
            LedgerError::Conflict => Self::Conflict,
        }
    }
}
