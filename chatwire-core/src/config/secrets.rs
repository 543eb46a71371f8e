//! Secret handling for client options
//!
//! API keys travel through option structs that are routinely `Debug`-printed
//! and logged, so they are wrapped in a type that never prints its value.

use std::fmt;

/// A wrapper type for sensitive strings like API keys
#[derive(Clone, Default)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the actual value (use with caution)
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    /// Check if the secret is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get a partially redacted version for debugging
    pub fn partial_redact(&self) -> String {
        if self.value.is_empty() {
            return "[EMPTY]".to_string();
        }

        let len = self.value.len();
        if len <= 8 || !self.value.is_ascii() {
            "[REDACTED]".to_string()
        } else if self.value.starts_with("sk-") {
            format!("{}...{}", &self.value[..3], &self.value[len - 4..])
        } else {
            format!("{}...{}", &self.value[..2], &self.value[len - 2..])
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Redact a header value when its name looks credential-bearing
pub fn redact_by_field_name(field_name: &str, value: &str) -> String {
    let sensitive_patterns = [
        "api_key",
        "api-key",
        "authorization",
        "secret",
        "token",
        "password",
        "credential",
    ];

    let field_lower = field_name.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| field_lower.contains(pattern))
    {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}
