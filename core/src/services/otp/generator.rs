//! One-time code generation

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entities::otp_record::CODE_LENGTH;

/// Generates fixed-length numeric one-time codes.
///
/// Uses OsRng (OS-provided CSPRNG) so codes are unpredictable across
/// processes and restarts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    /// Create a new code generator
    pub fn new() -> Self {
        Self
    }

    /// Generate a cryptographically secure random 6-digit code
    ///
    /// # Returns
    ///
    /// A zero-padded decimal string of exactly [`CODE_LENGTH`] digits
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        rng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes);
        // Modulo introduces a negligible bias for 6-digit codes
        let code = num % 1_000_000;
        format!("{:06}", code)
    }
}
