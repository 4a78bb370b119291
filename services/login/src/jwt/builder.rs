//! Claims builder.

use crate::error::TokenError;
use crate::jwt::claims::{TokenClaims, TokenKind};

/// Fluent builder for [`TokenClaims`].
pub struct ClaimsBuilder {
    issuer: String,
    kind: TokenKind,
    subject: Option<String>,
    audience: Option<String>,
    issued_at: Option<i64>,
    ttl_seconds: i64,
    scope: Option<String>,
    nonce: Option<String>,
}

impl ClaimsBuilder {
    /// Builder for a token of `kind` from `issuer`, 30 minute TTL.
    #[must_use]
    pub fn new(issuer: impl Into<String>, kind: TokenKind) -> Self {
        ClaimsBuilder {
            issuer: issuer.into(),
            kind,
            subject: None,
            audience: None,
            issued_at: None,
            ttl_seconds: 1800, // 30 minutes default
            scope: None,
            nonce: None,
        }
    }

    /// Required subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Audience (`aud`).
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Issued-at in unix seconds; defaults to now.
    #[must_use]
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.issued_at = Some(timestamp);
        self
    }

    /// Lifetime in seconds.
    #[must_use]
    pub fn ttl_seconds(mut self, ttl: i64) -> Self {
        self.ttl_seconds = ttl;
        self
    }

    /// Granted scope.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Nonce, kept on ID tokens only. Empty values are dropped.
    #[must_use]
    pub fn nonce(mut self, nonce: Option<String>) -> Self {
        self.nonce = nonce.filter(|n| !n.is_empty());
        self
    }

    /// Finish the claims with a fresh `jti`.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidRequest`] without a subject, [`TokenError::Config`]
    /// for a non-positive TTL or an expiry past `i64::MAX`.
    pub fn build(self) -> Result<TokenClaims, TokenError> {
        let subject = self
            .subject
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::invalid_request("subject is required"))?;
        if self.ttl_seconds <= 0 {
            return Err(TokenError::config("token TTL must be positive"));
        }

        let iat = self
            .issued_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let exp = iat
            .checked_add(self.ttl_seconds)
            .ok_or_else(|| TokenError::config("token expiry out of range"))?;

        Ok(TokenClaims {
            iss: self.issuer,
            sub: subject,
            aud: self.audience,
            iat,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
            scope: self.scope,
            // nonce is an ID-token claim only
            nonce: if self.kind == TokenKind::Id { self.nonce } else { None },
            typ: self.kind,
        })
    }
}
