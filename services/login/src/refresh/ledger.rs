//! Refresh token ledger.
//!
//! The only mutable shared state of the engine. Every mutating operation
//! holds the ledger lock for its whole read-modify-write, so rotations of
//! the same token are linearizable: exactly one caller gets the record.

use crate::clock::Clock;
use crate::metrics;
use crate::refresh::generator::RefreshTokenGenerator;
use crate::refresh::record::RefreshTokenRecord;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Ledger operation failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// No live record for the token (unknown, or already rotated).
    #[error("refresh token not found")]
    NotFound,
    /// Record existed but was past its expiry; it has been removed.
    #[error("refresh token expired")]
    Expired,
    /// Token id already used by a live or retired record.
    #[error("refresh token id conflict")]
    Conflict,
}

impl LedgerError {
    /// Metric label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Conflict => "conflict",
        }
    }
}

/// Storage contract for refresh tokens.
///
/// Implementations must make `rotate` atomic with respect to concurrent
/// calls for the same token.
pub trait TokenLedger: Send + Sync {
    /// Add a new record.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Conflict`] if the token id is live or was retired.
    fn insert(&self, record: RefreshTokenRecord) -> Result<(), LedgerError>;

    /// Remove the record for `token` and hand it back.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotFound`] or [`LedgerError::Expired`].
    fn rotate(&self, token: &str) -> Result<RefreshTokenRecord, LedgerError>;

    /// Live, unexpired record for `token`.
    fn lookup(&self, token: &str) -> Option<RefreshTokenRecord>;

    /// Drop live records with `expires_at <= now`, keeping their ids
    /// retired. Returns how many were removed.
    fn expire_sweep(&self, now: DateTime<Utc>) -> usize;

    /// Number of live records.
    fn len(&self) -> usize;

    /// Whether the ledger holds no live records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct LedgerState {
    live: HashMap<String, RefreshTokenRecord>,
    // hashes of consumed or expired tokens, kept for the ledger's lifetime
    retired: HashSet<String>,
    inserts_since_sweep: u64,
}

impl LedgerState {
    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .live
            .iter()
            .filter(|(_, record)| record.is_expired_at(now))
            .map(|(hash, _)| hash.clone())
            .collect();
        let removed = expired.len();
        for hash in expired {
            self.live.remove(&hash);
            self.retired.insert(hash);
        }
        self.inserts_since_sweep = 0;
        removed
    }
}

/// Process-local ledger. Nothing survives a restart.
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    clock: Arc<dyn Clock>,
    sweep_interval: u64,
}

impl InMemoryLedger {
    /// Create an empty ledger that sweeps every 256 inserts.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_sweep_interval(clock, 256)
    }

    /// Create an empty ledger with a custom opportunistic sweep interval.
    /// Zero disables opportunistic sweeps.
    #[must_use]
    pub fn with_sweep_interval(clock: Arc<dyn Clock>, sweep_interval: u64) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            clock,
            sweep_interval,
        }
    }

    #[cfg(test)]
    fn retired_len(&self) -> usize {
        self.state.lock().retired.len()
    }
}

impl TokenLedger for InMemoryLedger {
    fn insert(&self, record: RefreshTokenRecord) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.live.contains_key(&record.token_hash)
            || state.retired.contains(&record.token_hash)
        {
            warn!(subject = %record.subject, "Refresh token id collision");
            return Err(LedgerError::Conflict);
        }

        debug!(
            subject = %record.subject,
            client_id = %record.client_id,
            expires_at = %record.expires_at,
            "Stored refresh token"
        );
        state.live.insert(record.token_hash.clone(), record);
        state.inserts_since_sweep += 1;

        if self.sweep_interval > 0 && state.inserts_since_sweep >= self.sweep_interval {
            let removed = state.sweep(now);
            if removed > 0 {
                debug!(removed, "Swept expired refresh tokens");
            }
        }
        Ok(())
    }

    fn rotate(&self, token: &str) -> Result<RefreshTokenRecord, LedgerError> {
        let token_hash = RefreshTokenGenerator::hash(token);
        let now = self.clock.now();
        let mut state = self.state.lock();

        let Some(record) = state.live.remove(&token_hash) else {
            if state.retired.contains(&token_hash) {
                warn!("Refresh token replay - token already rotated");
                metrics::record_security_event("refresh_token_replay");
            }
            return Err(LedgerError::NotFound);
        };
        state.retired.insert(token_hash);

        if record.is_expired_at(now) {
            info!(subject = %record.subject, "Rejected expired refresh token");
            return Err(LedgerError::Expired);
        }

        info!(
            subject = %record.subject,
            client_id = %record.client_id,
            "Rotated refresh token"
        );
        Ok(record)
    }

    fn lookup(&self, token: &str) -> Option<RefreshTokenRecord> {
        let token_hash = RefreshTokenGenerator::hash(token);
        let now = self.clock.now();
        self.state
            .lock()
            .live
            .get(&token_hash)
            .filter(|record| !record.is_expired_at(now))
            .cloned()
    }

    fn expire_sweep(&self, now: DateTime<Utc>) -> usize {
        self.state.lock().sweep(now)
    }

    fn len(&self) -> usize {
        self.state.lock().live.len()
    }
}
