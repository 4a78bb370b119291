//! Token issuance: signed access/ID tokens plus an opaque refresh token.

use crate::config::Config;
use crate::error::TokenError;
use crate::jwt::{ClaimsBuilder, SigningAuthority, TokenKind};
use crate::metrics;
use crate::refresh::{RefreshTokenGenerator, RefreshTokenRecord, TokenLedger};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Token endpoint success body (RFC 6749 §5.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Opaque, single-use refresh token.
    pub refresh_token: String,
    /// Signed OIDC ID token.
    pub id_token: String,
    /// Granted scope.
    pub scope: String,
}

/// Mints token triples for verified subjects.
pub struct TokenIssuer {
    authority: Arc<SigningAuthority>,
    ledger: Arc<dyn TokenLedger>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer.
    #[must_use]
    pub fn new(
        authority: Arc<SigningAuthority>,
        ledger: Arc<dyn TokenLedger>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            authority,
            ledger,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Create an issuer with the TTLs from `config`.
    #[must_use]
    pub fn from_config(
        config: &Config,
        authority: Arc<SigningAuthority>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self::new(authority, ledger, config.access_token_ttl, config.refresh_token_ttl)
    }

    /// Issue an access token, an ID token bound to `client_id`, and a refresh token.
    ///
    /// Both signed tokens are produced before the ledger is touched, so a
    /// signing failure leaves no refresh record behind.
    ///
    /// # Errors
    ///
    /// [`TokenError::Signing`] if signing fails, [`TokenError::Config`] if an
    /// expiry falls outside the representable range, [`TokenError::Conflict`]
    /// if the refresh token id collides.
    pub fn issue_tokens(
        &self,
        subject: &str,
        scope: &str,
        client_id: &str,
        nonce: Option<&str>,
    ) -> Result<TokenResponse, TokenError> {
        let now = self.authority.clock().now();
        let issued_at = now.timestamp();
        let access_ttl = self.access_ttl.num_seconds();

        let access_claims = ClaimsBuilder::new(self.authority.issuer(), TokenKind::Access)
            .subject(subject)
            .scope(scope)
            .issued_at(issued_at)
            .ttl_seconds(access_ttl)
            .build()?;
        let id_claims = ClaimsBuilder::new(self.authority.issuer(), TokenKind::Id)
            .subject(subject)
            .audience(client_id)
            .nonce(nonce.map(str::to_string))
            .issued_at(issued_at)
            .ttl_seconds(access_ttl)
            .build()?;

        let access_token = self.authority.sign(&access_claims)?;
        let id_token = self.authority.sign(&id_claims)?;

        let refresh_token = RefreshTokenGenerator::generate();
        let record = RefreshTokenRecord::new(
            &refresh_token,
            subject,
            client_id,
            scope,
            now,
            self.refresh_ttl,
        )?;
        self.ledger.insert(record)?;

        let algorithm = self.authority.algorithm().as_str();
        metrics::record_token_issued(TokenKind::Access.as_str(), algorithm);
        metrics::record_token_issued(TokenKind::Id.as_str(), algorithm);
        metrics::record_token_issued(TokenKind::Refresh.as_str(), "opaque");

        info!(
            subject = %subject,
            client_id = %client_id,
            scope = %scope,
            "Issued token set"
        );

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: access_ttl,
            refresh_token,
            id_token,
            scope: scope.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::JwtAlgorithm;
    use crate::refresh::InMemoryLedger;
    use secrecy::SecretString;

    const NOW: i64 = 1_700_000_000;

    fn setup() -> (Arc<SigningAuthority>, Arc<InMemoryLedger>, TokenIssuer) {
        let clock = Arc::new(ManualClock::at_timestamp(NOW));
        let authority = Arc::new(SigningAuthority::new(
            "http://localhost:8000",
            "test-key",
            JwtAlgorithm::HS256,
            SecretString::from("issuer-test-secret"),
            clock.clone(),
        ));
        let ledger = Arc::new(InMemoryLedger::new(clock));
        let issuer = TokenIssuer::new(
            authority.clone(),
            ledger.clone(),
            Duration::minutes(30),
            Duration::days(7),
        );
        (authority, ledger, issuer)
    }

    #[test]
    fn test_issue_tokens() {
        let (authority, ledger, issuer) = setup();
        let response = issuer
            .issue_tokens("alice", "openid profile", "demo-client", Some("n-0S6"))
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 1800);
        assert_eq!(response.scope, "openid profile");

        let access = authority.verify_kind(&response.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, "alice");
        assert_eq!(access.exp, NOW + 1800);
        assert_eq!(access.scope.as_deref(), Some("openid profile"));
        assert!(access.nonce.is_none());

        let id = authority.verify_kind(&response.id_token, TokenKind::Id).unwrap();
        assert_eq!(id.aud.as_deref(), Some("demo-client"));
        assert_eq!(id.nonce.as_deref(), Some("n-0S6"));

        let record = ledger.lookup(&response.refresh_token).unwrap();
        assert_eq!(record.subject, "alice");
        assert_eq!(record.client_id, "demo-client");
        assert_eq!(record.expires_at.timestamp(), NOW + 7 * 86_400);
    }

    #[test]
    fn test_empty_subject_creates_no_record() {
        let (_, ledger, issuer) = setup();
        let result = issuer.issue_tokens("", "openid", "demo-client", None);

        assert!(result.is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unrepresentable_refresh_expiry_is_an_error() {
        let (authority, ledger, _) = setup();
        let issuer = TokenIssuer::new(
            authority,
            ledger.clone(),
            Duration::minutes(30),
            Duration::days(100_000_000),
        );

        let result = issuer.issue_tokens("alice", "openid", "demo-client", None);
        assert!(matches!(result, Err(TokenError::Config(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_each_issuance_has_fresh_tokens() {
        let (_, _, issuer) = setup();
        let first = issuer.issue_tokens("alice", "openid", "demo-client", None).unwrap();
        let second = issuer.issue_tokens("alice", "openid", "demo-client", None).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }
}
