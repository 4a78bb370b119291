//! Server-side refresh token records.

use crate::error::TokenError;
use crate::refresh::generator::RefreshTokenGenerator;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Server-side state of one opaque refresh token.
///
/// Created on issuance and destroyed on rotation or expiry; never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    /// SHA-256 of the raw token, base64url. Also the ledger key.
    pub token_hash: String,
    /// User the token was granted to.
    pub subject: String,
    /// Client the token is bound to.
    pub client_id: String,
    /// Scope of the original grant.
    pub scope: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// First instant at which the token is no longer accepted.
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Record for `token`, valid from `issued_at` for `ttl`.
    ///
    /// # Errors
    ///
    /// [`TokenError::Config`] if `issued_at + ttl` is out of chrono's range.
    pub fn new(
        token: &str,
        subject: impl Into<String>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::config("refresh token expiry out of range"))?;

        Ok(RefreshTokenRecord {
            token_hash: RefreshTokenGenerator::hash(token),
            subject: subject.into(),
            client_id: client_id.into(),
            scope: scope.into(),
            issued_at,
            expires_at,
        })
    }

    /// Expired once `now` reaches `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let issued_at = Utc::now();
        let record = RefreshTokenRecord::new(
            "token-1",
            "alice",
            "demo-client",
            "openid profile",
            issued_at,
            Duration::days(7),
        )
        .unwrap();

        assert_eq!(record.token_hash, RefreshTokenGenerator::hash("token-1"));
        assert_ne!(record.token_hash, "token-1");
        assert!(record.expires_at > record.issued_at);
        assert!(!record.is_expired_at(issued_at));
        assert!(record.is_expired_at(issued_at + Duration::days(7)));
    }

    #[test]
    fn test_out_of_range_expiry_is_an_error() {
        let result = RefreshTokenRecord::new(
            "token-1",
            "alice",
            "demo-client",
            "openid",
            Utc::now(),
            Duration::days(100_000_000),
        );
        assert!(matches!(result, Err(TokenError::Config(_))));
    }
}
