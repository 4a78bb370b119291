//! Grant request decoding and processing.

pub mod processor;
pub mod request;

pub use processor::{GrantProcessor, DEFAULT_SCOPE};
pub use request::{GrantRequest, GrantType, TokenRequestParams};
