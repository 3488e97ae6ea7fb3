use reqwest::StatusCode;
use thiserror::Error;

use crate::phone::PhoneError;

/// Errors surfaced by the authentication flows.
///
/// Nothing here is fatal: every variant is recoverable by user retry or by
/// navigating back to the sign-in screen.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("auth service error {status}: {body}")]
    Endpoint { status: StatusCode, body: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Phone(#[from] PhoneError),
    #[error("a request is already in flight")]
    RequestInFlight,
    #[error("no one-time code has been requested")]
    NoPendingChallenge,
    #[error("one-time code expired, request a new one")]
    CodeExpired,
    #[error("operation cancelled")]
    Cancelled,
}

impl AuthError {
    /// Whether retrying the same action can succeed without further input.
    ///
    /// An expired challenge needs a fresh request first, so it is the one
    /// flow error that is not directly retryable.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AuthError::CodeExpired)
    }
}
