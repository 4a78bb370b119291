//! Token claims and token kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of signed token, carried in the `typ` payload claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Access token for resource endpoints.
    Access,
    /// OIDC ID token, audience-bound to the client.
    Id,
    /// Refresh kind. Refresh tokens are opaque; signed ones are only ever rejected.
    Refresh,
}

impl TokenKind {
    /// Claim value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Id => "id",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload signed into access and ID tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    // Standard JWT claims
    /// Issuer URL.
    pub iss: String,
    /// Subject (username).
    #[serde(default)]
    pub sub: String,
    /// Audience, set on ID tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Unique token id.
    #[serde(default)]
    pub jti: String,

    // OAuth / OIDC claims
    /// Space-separated granted scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Client nonce, ID tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Token kind.
    pub typ: TokenKind,
}

impl TokenClaims {
    /// Expired at `now` (unix seconds). A token is dead at its `exp` second.
    #[must_use]
    pub const fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenClaims {
        TokenClaims {
            iss: "http://localhost:8000".to_string(),
            sub: "alice".to_string(),
            aud: None,
            iat: 1_000,
            exp: 2_800,
            jti: "jti-1".to_string(),
            scope: Some("openid profile".to_string()),
            nonce: None,
            typ: TokenKind::Access,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = sample();
        assert!(!claims.is_expired_at(2_799));
        assert!(claims.is_expired_at(2_800));
        assert!(claims.is_expired_at(9_000));
    }

    #[test]
    fn test_kind_serialized_lowercase() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["typ"], "access");
        assert!(json.get("aud").is_none());
        assert!(json.get("nonce").is_none());
    }
}
