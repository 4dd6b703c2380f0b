//! Storage contract for issued verification codes.

// `trait` is a keyword, so the file is mounted through a path alias.
#[path = "trait.rs"]
mod trait_;
pub mod r#trait {
    pub use super::trait_::*;
}

pub mod mock;


pub use mock::MockOtpRepository;
pub use r#trait::OtpRepository;
