//! Engine wiring: one signing authority, one ledger, and the components
//! built on top of them.

use crate::bearer::BearerValidator;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::credentials::CredentialVerifier;
use crate::error::TokenError;
use crate::grant::GrantProcessor;
use crate::issuer::TokenIssuer;
use crate::jwks::Jwks;
use crate::jwt::SigningAuthority;
use crate::refresh::{InMemoryLedger, TokenLedger};
use crate::registry::{ClientRegistry, CredentialStore, StaticClientRegistry, StaticCredentialStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything a transport needs to serve the token endpoints.
pub struct TokenEngine {
    config: Config,
    authority: Arc<SigningAuthority>,
    ledger: Arc<dyn TokenLedger>,
    processor: GrantProcessor,
    validator: BearerValidator,
}

impl TokenEngine {
    /// Build an engine from explicit collaborators.
    ///
    /// # Errors
    ///
    /// [`TokenError::Config`] if `config` fails validation.
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        clients: Arc<dyn ClientRegistry>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, TokenError> {
        config.validate()?;

        let authority = Arc::new(SigningAuthority::from_config(&config, clock.clone()));
        let ledger: Arc<dyn TokenLedger> = Arc::new(InMemoryLedger::with_sweep_interval(
            clock,
            config.ledger_sweep_interval,
        ));
        let issuer = TokenIssuer::from_config(&config, authority.clone(), ledger.clone());
        let processor = GrantProcessor::new(
            clients,
            CredentialVerifier::new(credentials),
            ledger.clone(),
            issuer,
        );
        let validator = BearerValidator::new(authority.clone());

        info!(
            issuer = %authority.issuer(),
            algorithm = %authority.algorithm().as_str(),
            kid = %authority.key_id(),
            "Token engine initialized"
        );

        Ok(Self {
            config,
            authority,
            ledger,
            processor,
            validator,
        })
    }

    /// Engine over the demo client and users, on the system clock.
    ///
    /// # Errors
    ///
    /// [`TokenError::Config`] if `config` fails validation.
    pub fn demo(config: Config) -> Result<Self, TokenError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Engine over the demo client and users, on a caller-supplied clock.
    ///
    /// # Errors
    ///
    /// [`TokenError::Config`] if `config` fails validation.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        let credentials = StaticCredentialStore::demo();
        debug!(
            users = ?credentials.usernames().collect::<Vec<_>>(),
            "Loaded demo credentials"
        );
        Self::new(
            config,
            clock,
            Arc::new(StaticClientRegistry::demo()),
            Arc::new(credentials),
        )
    }

    /// Grant processor behind the token endpoint.
    #[must_use]
    pub fn processor(&self) -> &GrantProcessor {
        &self.processor
    }

    /// Bearer validator behind protected resources.
    #[must_use]
    pub fn validator(&self) -> &BearerValidator {
        &self.validator
    }

    /// Signing authority shared by issuer and validator.
    #[must_use]
    pub fn authority(&self) -> &Arc<SigningAuthority> {
        &self.authority
    }

    /// Refresh token ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn TokenLedger> {
        &self.ledger
    }

    /// Published key set.
    #[must_use]
    pub fn jwks(&self) -> Jwks {
        let mut jwks = Jwks::new();
        jwks.add_key(self.authority.public_key_material());
        jwks
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::grant::GrantRequest;

    #[test]
    fn test_demo_engine_round_trip() {
        let clock = Arc::new(ManualClock::at_timestamp(1_700_000_000));
        let engine = TokenEngine::with_clock(Config::default(), clock).unwrap();

        let response = engine
            .processor()
            .process(GrantRequest::Password {
                client_id: "demo-client".to_string(),
                username: "alice".to_string(),
                password: "password123".to_string(),
                scope: None,
                nonce: None,
            })
            .unwrap();

        let header = format!("Bearer {}", response.access_token);
        let subject = engine.validator().resolve_subject(Some(&header), None).unwrap();
        assert_eq!(subject, "alice");
        assert_eq!(engine.ledger().len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            jwt_key_id: String::new(),
            ..Config::default()
        };
        assert!(matches!(TokenEngine::demo(config), Err(TokenError::Config(_))));
    }

    #[test]
    fn test_oversized_refresh_ttl_rejected() {
        let config = Config {
            refresh_token_ttl: chrono::Duration::days(100_000_000),
            ..Config::default()
        };
        assert!(matches!(TokenEngine::demo(config), Err(TokenError::Config(_))));
    }

    #[test]
    fn test_jwks_lists_configured_key() {
        let engine = TokenEngine::demo(Config::default()).unwrap();
        let jwks = engine.jwks();

        assert_eq!(jwks.keys.len(), 1);
        assert_eq!(jwks.keys[0].kid, "demo-symmetric-key");
        assert_eq!(jwks.keys[0].alg, "HS256");
    }
}
