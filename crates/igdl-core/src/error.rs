//! Resolution error type and its coarse classification.

use thiserror::Error;

/// Coarse failure class surfaced for diagnostics. Observers only ever see a
/// message and an error flag; this is for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Source URL failed validation.
    InvalidInput,
    /// Non-2xx status or transport fault.
    Network,
    /// Body was not JSON or had no recognizable media URL.
    Parse,
    /// Anything else (download submission failure, panicked task).
    UnknownFault,
}

/// Error returned by a [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not an Instagram post, reel or tv URL: {0}")]
    InvalidInput(String),
    #[error("resolver returned HTTP {0}")]
    Http(u32),
    #[error("resolver request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("unrecognized resolver response: {0}")]
    Parse(String),
}

impl ResolveError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ResolveError::InvalidInput(_) => FailureKind::InvalidInput,
            ResolveError::Http(_) | ResolveError::Transport(_) => FailureKind::Network,
            ResolveError::Parse(_) => FailureKind::Parse,
        }
    }
}
