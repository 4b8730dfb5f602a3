//! Error taxonomy for the configuration and metrics engine.
//!
//! Every failure surfaces with a stable, classifiable kind so the caller
//! can map it to a contextual message. Nothing here is retried internally.

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::models::ConfigError;

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// The account service could not be reached.
    #[error("account service unavailable")]
    Unavailable(#[from] reqwest::Error),

    /// The account service reached us but rejected the call with a
    /// provider-specific reason (e.g. trading permission not enabled).
    #[error("account service rejected the request: {0}")]
    Rejected(String),

    /// A configuration index no longer exists. Indices shift down after a
    /// delete, so a stale index held across a mutation lands here.
    #[error("bot configuration index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
