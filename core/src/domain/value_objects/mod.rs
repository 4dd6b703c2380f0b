//! Immutable values passed across service boundaries.

pub mod session_tokens;

pub use session_tokens::SessionTokens;
