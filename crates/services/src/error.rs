//! Shared error types for the services crate.

use thiserror::Error;

use mindful_core::CoreError;
use mindful_core::model::{ProgramError, SessionId};

/// Errors surfaced by `ProgramApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("backend returned an invalid body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgramService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgramServiceError {
    #[error("completion info for session {requested} came back for session {received}")]
    MismatchedCompletionInfo {
        requested: SessionId,
        received: SessionId,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ProgramServiceError {
    /// True when the backend reported the requested record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::NotFound(_)))
    }
}
