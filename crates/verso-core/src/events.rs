//! Turn event types shared by the front-ends.
//!
//! A turn runs on a spawned task against a transcript snapshot; its outcome
//! comes back as a single `TurnEvent` which the owning front-end applies to
//! the session.

use std::fmt;

use crate::provider::ProviderErrorKind;

/// Which instruction template a turn uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    /// First-turn code generation.
    Initial,
    /// Iterative adjustment of the previous output.
    Feedback,
}

/// Outcome of a turn request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The model answered; ready to commit to the session.
    Completed {
        /// The user's raw instruction.
        label: String,
        /// The composed prompt that was sent (template + label).
        prompt: String,
        /// The raw model response.
        response: String,
    },
    /// The request failed; nothing to commit.
    Failed {
        kind: ErrorKind,
        message: String,
        details: Option<String>,
    },
    /// The user canceled the request before it resolved.
    Interrupted,
}

/// Error categories for `TurnEvent::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection/request timeout
    Timeout,
    /// Response parsing failed
    Parse,
    /// API-level error from provider
    ApiError,
    /// Internal/unknown error
    Internal,
}

impl From<ProviderErrorKind> for ErrorKind {
    fn from(kind: ProviderErrorKind) -> Self {
        match kind {
            ProviderErrorKind::HttpStatus => ErrorKind::HttpStatus,
            ProviderErrorKind::Timeout => ErrorKind::Timeout,
            ProviderErrorKind::Parse => ErrorKind::Parse,
            ProviderErrorKind::ApiError => ErrorKind::ApiError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::HttpStatus => write!(f, "http_status"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::ApiError => write!(f, "api_error"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}
