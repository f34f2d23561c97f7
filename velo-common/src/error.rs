//! Common error types for the review console

use thiserror::Error;

/// Common result type for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the review console.
///
/// Everything except `AuthExpired` is locally recoverable: the operator can
/// correct input, retry, or navigate away. `AuthExpired` means the one-shot
/// token refresh failed; the session store has been cleared and the operator
/// must log in again.
#[derive(Error, Debug)]
pub enum Error {
    /// Local input validation failed; no network call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote photo record is already locked by another session
    #[error("Photo {0} is locked by another session")]
    LockConflict(i64),

    /// Vehicle registry returned a well-formed empty result
    #[error("Vehicle lookup found no match: {0}")]
    LookupNotFound(String),

    /// Transport failure or non-2xx response with a message payload
    #[error("Service error: {0}")]
    Service(String),

    /// Processing endpoint answered without transport failure but with a
    /// non-success status
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Token refresh failed; session cleared, re-login required
    #[error("Authentication expired")]
    AuthExpired,

    /// Session store operation error (wraps sqlx::Error)
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// HTTP client error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the operator can recover without re-authenticating
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::AuthExpired)
    }
}
