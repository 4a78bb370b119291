//! Grant state machine for the token endpoint.

use crate::credentials::CredentialVerifier;
use crate::error::TokenError;
use crate::grant::request::{GrantRequest, TokenRequestParams};
use crate::issuer::{TokenIssuer, TokenResponse};
use crate::metrics;
use crate::refresh::TokenLedger;
use crate::registry::ClientRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Scope granted when the password grant does not request one.
pub const DEFAULT_SCOPE: &str = "openid profile";

/// Dispatches decoded grant requests to the verifier, ledger and issuer.
pub struct GrantProcessor {
    clients: Arc<dyn ClientRegistry>,
    verifier: CredentialVerifier,
    ledger: Arc<dyn TokenLedger>,
    issuer: TokenIssuer,
}

impl GrantProcessor {
    /// Create a processor.
    ///
    /// `ledger` must be the same ledger `issuer` inserts into.
    #[must_use]
    pub fn new(
        clients: Arc<dyn ClientRegistry>,
        verifier: CredentialVerifier,
        ledger: Arc<dyn TokenLedger>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            clients,
            verifier,
            ledger,
            issuer,
        }
    }

    /// Decode raw parameters and process the grant.
    ///
    /// # Errors
    ///
    /// Any [`TokenError`] from decoding or processing.
    pub fn process_grant(&self, params: TokenRequestParams) -> Result<TokenResponse, TokenError> {
        let grant_type = params.grant_type.clone().unwrap_or_default();
        let request = GrantRequest::try_from(params).inspect_err(|e| {
            metrics::record_grant(&grant_type, e.error_code());
        })?;
        self.process(request)
    }

    /// Process a decoded grant.
    ///
    /// # Errors
    ///
    /// `UnknownClient`, `InvalidCredentials`, `InvalidRefreshToken`, or an
    /// issuance failure.
    pub fn process(&self, request: GrantRequest) -> Result<TokenResponse, TokenError> {
        let grant_type = request.grant_type();
        let result = match request {
            GrantRequest::Password {
                client_id,
                username,
                password,
                scope,
                nonce,
            } => self.password_grant(&client_id, &username, &password, scope, nonce),
            GrantRequest::RefreshToken {
                client_id,
                refresh_token,
            } => self.refresh_grant(&client_id, &refresh_token),
        };

        let status = match &result {
            Ok(_) => "success",
            Err(e) => e.error_code(),
        };
        metrics::record_grant(grant_type.as_str(), status);
        result
    }

    fn password_grant(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
        scope: Option<String>,
        nonce: Option<String>,
    ) -> Result<TokenResponse, TokenError> {
        self.validate_client(client_id)?;
        info!(username = %username, client_id = %client_id, "Password grant login attempt");

        if !self.verifier.verify(username, password) {
            warn!(username = %username, client_id = %client_id, "Invalid credentials");
            return Err(TokenError::InvalidCredentials);
        }

        let scope = scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        let response = self
            .issuer
            .issue_tokens(username, &scope, client_id, nonce.as_deref())?;

        info!(username = %username, client_id = %client_id, "User logged in");
        Ok(response)
    }

    fn refresh_grant(
        &self,
        client_id: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse, TokenError> {
        self.validate_client(client_id)?;

        // From here on the old token is gone, whatever happens to the re-issue.
        let record = match self.ledger.rotate(refresh_token) {
            Ok(record) => record,
            Err(e) => {
                metrics::record_refresh_rotation(e.as_str());
                warn!(client_id = %client_id, error = %e, "Refresh token rejected");
                return Err(e.into());
            }
        };

        if record.client_id != client_id {
            metrics::record_refresh_rotation("client_mismatch");
            metrics::record_security_event("refresh_token_client_mismatch");
            warn!(
                subject = %record.subject,
                issued_to = %record.client_id,
                presented_by = %client_id,
                "Refresh token presented by another client"
            );
            return Err(TokenError::InvalidRefreshToken);
        }

        let response =
            self.issuer
                .issue_tokens(&record.subject, &record.scope, client_id, None)?;
        metrics::record_refresh_rotation("success");

        info!(subject = %record.subject, client_id = %client_id, "Refreshed tokens");
        Ok(response)
    }

    fn validate_client(&self, client_id: &str) -> Result<(), TokenError> {
        if self.clients.lookup(client_id).is_none() {
            warn!(client_id = %client_id, "Unknown client");
            return Err(TokenError::UnknownClient);
        }
        Ok(())
    }
}
