//! Exchange credential validation.
//!
//! Rejects malformed API keys before they ever leave the process. The
//! secret is never stored locally; this module only checks format ahead of
//! the handoff to the account service, which re-validates on its side.

use thiserror::Error;

/// Inclusive length bounds for the API key.
const KEY_LENGTH: std::ops::RangeInclusive<usize> = 8..=64;

/// Inclusive length bounds for the API secret.
const SECRET_LENGTH: std::ops::RangeInclusive<usize> = 32..=128;

/// A formatting violation in a key/secret pair.
///
/// Checks short-circuit: only the first violation found is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("API key and secret must not be empty")]
    EmptyField,

    #[error("API key must be between 8 and 64 characters")]
    KeyLengthOutOfRange,

    #[error("API secret must be between 32 and 128 characters")]
    SecretLengthOutOfRange,

    #[error("credentials must not contain whitespace")]
    ContainsWhitespace,

    #[error("credentials may only contain letters, digits, '-' and '_'")]
    InvalidCharacters,
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validate an exchange key/secret pair.
///
/// Order of checks: emptiness, key length, secret length, whitespace,
/// character set. Returns on the first violation rather than aggregating.
pub fn validate(key: &str, secret: &str) -> Result<(), CredentialError> {
    if key.trim().is_empty() || secret.trim().is_empty() {
        return Err(CredentialError::EmptyField);
    }

    if !KEY_LENGTH.contains(&key.len()) {
        return Err(CredentialError::KeyLengthOutOfRange);
    }

    if !SECRET_LENGTH.contains(&secret.len()) {
        return Err(CredentialError::SecretLengthOutOfRange);
    }

    if key.chars().any(char::is_whitespace) || secret.chars().any(char::is_whitespace) {
        return Err(CredentialError::ContainsWhitespace);
    }

    if !key.chars().all(is_allowed) || !secret.chars().all(is_allowed) {
        return Err(CredentialError::InvalidCharacters);
    }

    Ok(())
}
