//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service and how core errors map onto
//! HTTP responses.

use crate::config::ConfigError;
use axum::http::StatusCode;
use interview_room_core::CoreError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The status code a handler answers with for a core error. The body is always the
/// error's user-facing message.
pub fn status_for(error: &CoreError) -> StatusCode {
    match error {
        CoreError::InvalidInput(_)
        | CoreError::MissingRoomId
        | CoreError::MissingCandidateId
        | CoreError::MissingInterviewerId => StatusCode::BAD_REQUEST,
        CoreError::SubmissionInProgress => StatusCode::CONFLICT,
        CoreError::RoomUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::ServerRejected { .. }
        | CoreError::NetworkUnreachable(_)
        | CoreError::UnknownSubmitFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Converts a core error into the `(StatusCode, String)` pair handlers return.
pub fn reject(error: CoreError) -> (StatusCode, String) {
    (status_for(&error), error.to_string())
}
