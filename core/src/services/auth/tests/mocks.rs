//! Test doubles for the auth service collaborators.
//!
//! The channel mocks mirror the ones in the OTP service tests; the
//! password verifier and session issuer are specific to this module.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::value_objects::SessionTokens;
use crate::services::auth::{PasswordVerifier, SessionIssuer};
use crate::services::otp::{EmailChannel, SmsChannel};

/// In-memory email channel. Whether sends fail is fixed at construction.
pub struct MockEmailChannel {
    outbox: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MockEmailChannel {
    pub fn new(fail: bool) -> Self {
        Self {
            outbox: Mutex::new(HashMap::new()),
            fail,
        }
    }

    /// Last code delivered to `email`, if any.
    pub fn get_sent_code(&self, email: &str) -> Option<String> {
        self.outbox.lock().unwrap().get(email).cloned()
    }

    /// Number of distinct recipients that received a message.
    pub fn sent_count(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailChannel for MockEmailChannel {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        if self.fail {
            return Err("Email channel error".to_string());
        }
        let mut outbox = self.outbox.lock().unwrap();
        outbox.insert(email.to_string(), code.to_string());
        Ok(format!("mock-mail-{}", uuid::Uuid::new_v4()))
    }
}

/// In-memory SMS channel that never fails.
pub struct MockSmsChannel {
    outbox: Mutex<HashMap<String, String>>,
}

impl MockSmsChannel {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SmsChannel for MockSmsChannel {
    async fn send_code(&self, phone: &str, code: &str) -> Result<String, String> {
        let mut outbox = self.outbox.lock().unwrap();
        outbox.insert(phone.to_string(), code.to_string());
        Ok(format!("mock-sms-{}", uuid::Uuid::new_v4()))
    }
}

/// Password verifier backed by an allow-list filled in by the test.
pub struct MockPasswordVerifier {
    accepted: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MockPasswordVerifier {
    pub fn new(fail: bool) -> Self {
        Self {
            accepted: Mutex::new(HashMap::new()),
            fail,
        }
    }

    /// Register a credential pair the verifier will accept.
    pub fn allow(&self, identity: &str, password: &str) {
        let mut accepted = self.accepted.lock().unwrap();
        accepted.insert(identity.to_string(), password.to_string());
    }
}

#[async_trait]
impl PasswordVerifier for MockPasswordVerifier {
    async fn verify_password(&self, identity: &str, password: &str) -> Result<bool, String> {
        if self.fail {
            return Err("Account store unreachable".to_string());
        }
        let accepted = self.accepted.lock().unwrap();
        Ok(accepted.get(identity).map(String::as_str) == Some(password))
    }
}

/// Session issuer that records which identities it minted tokens for.
pub struct MockSessionIssuer {
    issued: Mutex<Vec<String>>,
    fail: bool,
}

impl MockSessionIssuer {
    pub fn new(fail: bool) -> Self {
        Self {
            issued: Mutex::new(Vec::new()),
            fail,
        }
    }

    pub fn issued_count(&self) -> usize {
        self.issued.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionIssuer for MockSessionIssuer {
    async fn issue_session(&self, identity: &str) -> Result<SessionTokens, String> {
        if self.fail {
            return Err("Signing key unavailable".to_string());
        }
        self.issued.lock().unwrap().push(identity.to_string());
        Ok(SessionTokens::new(
            format!("mock-access-{}", identity),
            format!("mock-refresh-{}", identity),
            900,
        ))
    }
}
