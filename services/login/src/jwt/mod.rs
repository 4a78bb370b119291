//! Signed token claims, building, serialization and verification.

pub mod builder;
pub mod claims;
pub mod serializer;
pub mod signer;

pub use builder::ClaimsBuilder;
pub use claims::{TokenClaims, TokenKind};
pub use serializer::JwtSerializer;
pub use signer::{SigningAuthority, VerifyError};
