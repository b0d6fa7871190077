//! Provider credentials held in secure memory.
//!
//! Uses the `secrecy` crate so API keys never show up in logs, debug output
//! or error messages. An absent or blank credential is represented as
//! `None` by the constructors, which is what disables a provider.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// An API key or token for one evidence provider.
pub struct Credential(SecretBox<str>);

impl Credential {
    /// Wrap a token. Blank tokens are rejected.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretBox::new(Box::from(trimmed))))
    }

    /// Read a token from an environment variable.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(Self::new)
    }

    /// Expose the token for an outbound request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self(SecretBox::new(Box::from(self.expose())))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_redacted() {
        let key = Credential::new("AIza-secret-key").unwrap();
        assert!(!format!("{:?}", key).contains("AIza"));
        assert_eq!(format!("{}", key), "[REDACTED]");
        assert_eq!(key.expose(), "AIza-secret-key");
    }

    #[test]
    fn test_blank_credential_is_none() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn test_credential_trimmed() {
        let key = Credential::new("  tvly-123\n").unwrap();
        assert_eq!(key.expose(), "tvly-123");
    }
}
