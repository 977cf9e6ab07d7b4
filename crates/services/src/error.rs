//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by the quiz API client.
///
/// These always reach the caller: quiz content must be fresh, so there is
/// no silent fallback. Storage failures, by contrast, never appear in any
/// services signature; they are absorbed and logged where they arise.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizApiError {
    #[error("quiz api request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("quiz api rejected the request: {0}")]
    Rejected(String),

    #[error("quiz api response is missing its data payload")]
    MissingData,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
