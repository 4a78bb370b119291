//! Refresh token minting and hashing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Entropy per refresh token.
pub const TOKEN_BYTES: usize = 32;

/// Mints opaque refresh tokens and derives their ledger keys.
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    /// `TOKEN_BYTES` from the thread-local CSPRNG, base64url encoded.
    #[must_use]
    pub fn generate() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Ledger key for a token. The raw value is never stored.
    #[must_use]
    pub fn hash(token: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
    }
}
