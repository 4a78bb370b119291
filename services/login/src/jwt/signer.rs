//! Signing authority: the process-wide symmetric key.
//!
//! Signs access and ID token claims and verifies presented tokens in a
//! fixed order: signature, then expiry against the clock at verification
//! time, then payload structure (claims shape, issuer, token kind).

use crate::clock::Clock;
use crate::config::{Config, JwtAlgorithm};
use crate::error::TokenError;
use crate::jwks::Jwk;
use crate::jwt::claims::{TokenClaims, TokenKind};
use crate::jwt::serializer::JwtSerializer;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;

/// Verification failure. Callers outside the core only see
/// [`TokenError::InvalidToken`] or [`TokenError::Expired`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Signature does not match the payload.
    #[error("signature invalid")]
    InvalidSignature,
    /// `now >= exp`.
    #[error("token expired")]
    Expired,
    /// Not a JWS, wrong algorithm, or claims of the wrong shape.
    #[error("token malformed: {0}")]
    Malformed(String),
}

/// Holds the signing key and produces/validates signed tokens.
pub struct SigningAuthority {
    issuer: String,
    key_id: String,
    algorithm: JwtAlgorithm,
    secret: SecretString,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    serializer: JwtSerializer,
    clock: Arc<dyn Clock>,
}

impl SigningAuthority {
    /// Create an authority for the given key material.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        key_id: impl Into<String>,
        algorithm: JwtAlgorithm,
        secret: SecretString,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(bytes);
        let decoding_key = DecodingKey::from_secret(bytes);

        Self {
            issuer: issuer.into(),
            key_id: key_id.into(),
            algorithm,
            secret,
            encoding_key,
            decoding_key,
            serializer: JwtSerializer::new(algorithm),
            clock,
        }
    }

    /// Create an authority from service configuration.
    #[must_use]
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.issuer_base(),
            config.jwt_key_id.clone(),
            config.jwt_algorithm,
            config.jwt_secret.clone(),
            clock,
        )
    }

    /// Sign claims into a compact JWS with `kid` in the header.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        self.serializer
            .serialize(claims, &self.encoding_key, Some(&self.key_id))
    }

    /// Verify a token of any kind.
    ///
    /// # Errors
    ///
    /// See [`VerifyError`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims, VerifyError> {
        let payload = self
            .serializer
            .verify_signature(token, &self.decoding_key)?;

        let exp = payload
            .get("exp")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| VerifyError::Malformed("missing exp".to_string()))?;
        if self.clock.timestamp() >= exp {
            return Err(VerifyError::Expired);
        }

        let claims: TokenClaims = serde_json::from_value(payload)
            .map_err(|e| VerifyError::Malformed(e.to_string()))?;
        if claims.iss != self.issuer {
            return Err(VerifyError::Malformed("issuer mismatch".to_string()));
        }

        Ok(claims)
    }

    /// Verify a token and require its `typ` claim to be `expected`.
    ///
    /// # Errors
    ///
    /// Cross-kind replay is reported as [`VerifyError::Malformed`].
    pub fn verify_kind(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<TokenClaims, VerifyError> {
        let claims = self.verify(token)?;
        if claims.typ != expected {
            return Err(VerifyError::Malformed(format!(
                "expected {expected} token, got {}",
                claims.typ
            )));
        }
        Ok(claims)
    }

    /// Verification key as a JWK.
    ///
    /// The key is symmetric, so this hands out the signing secret itself:
    /// anyone holding it can mint tokens. Only acceptable for demo setups.
    #[must_use]
    pub fn public_key_material(&self) -> Jwk {
        Jwk::symmetric(
            &self.key_id,
            self.algorithm,
            self.secret.expose_secret().as_bytes(),
        )
    }

    /// Issuer placed in every token.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Key id placed in every header.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> JwtAlgorithm {
        self.algorithm
    }

    /// Clock used for expiry checks.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
