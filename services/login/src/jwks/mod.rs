//! JSON Web Key Set exposure.

use crate::config::JwtAlgorithm;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

/// A single JWK (RFC 7517).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    /// Key type.
    pub kty: String,
    /// Key id, matches the `kid` token header.
    pub kid: String,
    /// Intended use.
    #[serde(rename = "use")]
    pub key_use: String,
    /// Signing algorithm.
    pub alg: String,
    /// Symmetric key value, base64url without padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

impl Jwk {
    /// Octet-sequence key for HMAC signing.
    #[must_use]
    pub fn symmetric(kid: &str, algorithm: JwtAlgorithm, secret: &[u8]) -> Self {
        Jwk {
            kty: "oct".to_string(),
            kid: kid.to_string(),
            key_use: "sig".to_string(),
            alg: algorithm.as_str().to_string(),
            k: Some(URL_SAFE_NO_PAD.encode(secret)),
        }
    }
}

/// Key set served at the JWKS endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwks {
    /// Published keys.
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Empty key set.
    #[must_use]
    pub fn new() -> Self {
        Jwks { keys: Vec::new() }
    }

    /// Publish another key.
    pub fn add_key(&mut self, key: Jwk) {
        self.keys.push(key);
    }
}
