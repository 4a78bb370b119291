//! Credential verification.

use crate::registry::CredentialStore;
use secrecy::ExposeSecret;
use std::sync::Arc;
use subtle::{Choice, ConstantTimeEq};

// Compared against when the username is unknown, so both failure paths do the same work.
const DUMMY_SECRET: &[u8] = b"dummy-secret-for-unknown-users!!";

/// Checks presented username/password pairs against a [`CredentialStore`].
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    /// Create a verifier over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Whether `presented` matches the secret registered for `username`.
    ///
    /// Unknown users and wrong secrets are indistinguishable to the caller.
    #[must_use]
    pub fn verify(&self, username: &str, presented: &str) -> bool {
        match self.store.secret(username) {
            Some(stored) => bool::from(constant_time_eq(
                stored.expose_secret().as_bytes(),
                presented.as_bytes(),
            )),
            None => {
                let _ = constant_time_eq(DUMMY_SECRET, presented.as_bytes());
                false
            }
        }
    }
}

/// Equality in time proportional to `stored.len()` only.
fn constant_time_eq(stored: &[u8], presented: &[u8]) -> Choice {
    let mut equal = (stored.len() as u64).ct_eq(&(presented.len() as u64));
    for (i, byte) in stored.iter().enumerate() {
        let other = presented.get(i).copied().unwrap_or(0);
        equal &= byte.ct_eq(&other);
    }
    equal
}
