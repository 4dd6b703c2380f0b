//! Operating mode detection.

use std::env;

use serde::{Deserialize, Serialize};

/// Operating mode of the service.
///
/// The mode gates behavior that must never be on by default, most notably
/// echoing generated codes in API responses for test automation. Anything
/// that fails to resolve a mode runs as `Production`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Local development and test automation
    Development,
    /// Live deployment
    #[default]
    Production,
}

impl OperatingMode {
    pub fn is_development(self) -> bool {
        self == OperatingMode::Development
    }

    /// Resolve the mode from `ENVIRONMENT`, `ENV` or `RUST_ENV`, first one
    /// set wins. Unset and unrecognized values both land on `Production`,
    /// so development behavior always requires an explicit opt-in.
    pub fn from_env() -> Self {
        ["ENVIRONMENT", "ENV", "RUST_ENV"]
            .iter()
            .find_map(|name| env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or(OperatingMode::Production)
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OperatingMode::Development => "development",
            OperatingMode::Production => "production",
        })
    }
}

impl std::str::FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(OperatingMode::Development),
            "production" | "prod" => Ok(OperatingMode::Production),
            other => Err(format!("Unknown operating mode: {}", other)),
        }
    }
}
