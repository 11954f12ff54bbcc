//! crates/interview_room_core/src/error.rs
//!
//! The error taxonomy surfaced to participants. The `Display` text of each variant is the
//! message shown in the UI banner.

use crate::domain::RoomKey;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Room '{key}' is unavailable: {reason}")]
    RoomUnavailable { key: RoomKey, reason: String },

    #[error("Room ID is missing. Please ensure you accessed this page from a valid meeting link.")]
    MissingRoomId,

    #[error("Candidate ID is missing. Please ensure you accessed this page from a valid meeting link.")]
    MissingCandidateId,

    #[error("Interviewer ID is missing. Please ensure you accessed this page from a valid meeting link.")]
    MissingInterviewerId,

    #[error("Failed to submit feedback: {message}")]
    ServerRejected { status: u16, message: String },

    #[error("Failed to submit feedback: Network error. Please check your connection.")]
    NetworkUnreachable(String),

    #[error("Failed to submit feedback: Please try again.")]
    UnknownSubmitFailure(String),

    #[error("Feedback is already being submitted.")]
    SubmissionInProgress,
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidInput(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
