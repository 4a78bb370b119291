//! Token endpoint request decoding.
//!
//! The wire form is a flat bag of optional parameters. It is decoded once,
//! at the boundary, into a closed [`GrantRequest`] so the processor never
//! branches on strings.

use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw token endpoint parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRequestParams {
    /// Requested grant.
    pub grant_type: Option<String>,
    /// Calling client.
    pub client_id: Option<String>,
    /// Resource owner (password grant).
    pub username: Option<String>,
    /// Resource owner secret (password grant).
    #[serde(alias = "secret")]
    pub password: Option<String>,
    /// Requested scope (password grant).
    pub scope: Option<String>,
    /// OIDC nonce echoed into the ID token (password grant).
    pub nonce: Option<String>,
    /// Refresh token being exchanged (refresh grant).
    pub refresh_token: Option<String>,
}

/// Supported grant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// Resource Owner Password Credentials.
    Password,
    /// Refresh token exchange.
    RefreshToken,
}

impl GrantType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(Self::Password),
            "refresh_token" => Ok(Self::RefreshToken),
            other => Err(TokenError::UnsupportedGrant(other.to_string())),
        }
    }
}

/// A decoded grant request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantRequest {
    /// Exchange username and password for tokens.
    Password {
        /// Calling client.
        client_id: String,
        /// Resource owner.
        username: String,
        /// Presented secret.
        password: String,
        /// Requested scope, if any.
        scope: Option<String>,
        /// ID token nonce, if any.
        nonce: Option<String>,
    },
    /// Exchange a refresh token for a fresh token set.
    RefreshToken {
        /// Calling client.
        client_id: String,
        /// Token being rotated.
        refresh_token: String,
    },
}

impl GrantRequest {
    /// Grant type of this request.
    #[must_use]
    pub const fn grant_type(&self) -> GrantType {
        match self {
            Self::Password { .. } => GrantType::Password,
            Self::RefreshToken { .. } => GrantType::RefreshToken,
        }
    }

    /// Calling client.
    #[must_use]
    pub fn client_id(&self) -> &str {
        match self {
            Self::Password { client_id, .. } | Self::RefreshToken { client_id, .. } => client_id,
        }
    }
}

impl TryFrom<TokenRequestParams> for GrantRequest {
    type Error = TokenError;

    fn try_from(params: TokenRequestParams) -> Result<Self, Self::Error> {
        let grant_type: GrantType = non_empty(params.grant_type)
            .ok_or_else(|| TokenError::UnsupportedGrant(String::new()))?
            .parse()?;
        let client_id = non_empty(params.client_id).ok_or(TokenError::UnknownClient)?;

        match grant_type {
            GrantType::Password => {
                let (Some(username), Some(password)) =
                    (non_empty(params.username), non_empty(params.password))
                else {
                    return Err(TokenError::invalid_request(
                        "username and password are required for password grant",
                    ));
                };
                Ok(Self::Password {
                    client_id,
                    username,
                    password,
                    scope: non_empty(params.scope),
                    nonce: non_empty(params.nonce),
                })
            }
            GrantType::RefreshToken => {
                let refresh_token = non_empty(params.refresh_token).ok_or_else(|| {
                    TokenError::invalid_request("refresh_token is required for refresh_token grant")
                })?;
                Ok(Self::RefreshToken {
                    client_id,
                    refresh_token,
                })
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
