//! Opaque refresh tokens and the ledger that tracks them.

pub mod generator;
pub mod ledger;
pub mod record;

pub use generator::RefreshTokenGenerator;
pub use ledger::{InMemoryLedger, LedgerError, TokenLedger};
pub use record::RefreshTokenRecord;
