//! JWT encoding and signature verification.

use crate::config::JwtAlgorithm;
use crate::error::TokenError;
use crate::jwt::VerifyError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

/// HMAC JWT encoder and signature checker.
pub struct JwtSerializer {
    algorithm: Algorithm,
}

impl JwtSerializer {
    /// Serializer for `algorithm`.
    #[must_use]
    pub fn new(algorithm: JwtAlgorithm) -> Self {
        JwtSerializer {
            algorithm: algorithm.to_jsonwebtoken(),
        }
    }

    /// Sign `claims`, putting `key_id` in the header when given.
    ///
    /// # Errors
    ///
    /// [`TokenError::Signing`] if encoding fails.
    pub fn serialize<T: Serialize>(
        &self,
        claims: &T,
        key: &EncodingKey,
        key_id: Option<&str>,
    ) -> Result<String, TokenError> {
        let mut header = Header::new(self.algorithm);
        if let Some(kid) = key_id {
            header.kid = Some(kid.to_string());
        }

        encode(&header, claims, key).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature and return the raw payload.
    ///
    /// Time-based and registered-claim checks are left to the caller so the
    /// signature is always judged before anything inside the payload.
    pub fn verify_signature(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<serde_json::Value, VerifyError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
                _ => VerifyError::Malformed(e.to_string()),
            })
    }
}
