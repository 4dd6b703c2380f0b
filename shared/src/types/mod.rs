//! Wire-level types used by every crate in the workspace.

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ApiResponse, ErrorBody, HealthResponse};
