//! crates/interview_room_core/src/submitter.rs
//!
//! Builds the feedback payload and performs exactly one submission attempt.
//! There is no retry here: a failed attempt is repeated only when the participant
//! submits again, and the wizard keeps every answer in between.

use crate::domain::{FeedbackBody, FeedbackPayload, ParticipantIdentity, RoomKey};
use crate::error::{CoreError, CoreResult};
use crate::ports::{FeedbackTransport, TransportFailure, TransportReply};
use crate::questions::QuestionSet;
use crate::wizard::FeedbackWizard;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Where submissions go. Resolved once at startup.
///
/// With a base URL, interviewer feedback goes to `<base>/interviewer/feedback` and candidate
/// feedback to `<base>/candidate/feedback`. Without one, everything goes to `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEndpoints {
    base_url: Option<String>,
    fallback: String,
}

impl FeedbackEndpoints {
    pub fn new(base_url: Option<String>, fallback: impl Into<String>) -> Self {
        Self {
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
            fallback: fallback.into(),
        }
    }

    pub fn endpoint_for(&self, questions: QuestionSet) -> String {
        match (&self.base_url, questions) {
            (Some(base), QuestionSet::Interviewer(_)) => format!("{base}/interviewer/feedback"),
            (Some(base), QuestionSet::Candidate(_)) => format!("{base}/candidate/feedback"),
            (None, _) => self.fallback.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FeedbackSubmitter {
    transport: Arc<dyn FeedbackTransport>,
    endpoints: FeedbackEndpoints,
}

impl FeedbackSubmitter {
    pub fn new(transport: Arc<dyn FeedbackTransport>, endpoints: FeedbackEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &FeedbackEndpoints {
        &self.endpoints
    }

    /// Submits the wizard's answers once. Validation failures never reach the network.
    pub async fn submit(
        &self,
        wizard: &FeedbackWizard,
        room_key: Option<&RoomKey>,
        identity: &ParticipantIdentity,
    ) -> CoreResult<FeedbackPayload> {
        let payload = build_payload(wizard, room_key, identity)?;
        let body = serde_json::to_value(&payload)
            .map_err(|e| CoreError::UnknownSubmitFailure(e.to_string()))?;
        let endpoint = self.endpoints.endpoint_for(wizard.question_set());

        info!(
            "Submitting {} feedback for room {} to {}",
            payload.user_type, payload.interview_request_id, endpoint
        );
        let outcome = classify(self.transport.post_json(&endpoint, &body).await);
        match &outcome {
            Ok(()) => info!("Feedback for room {} accepted", payload.interview_request_id),
            Err(e) => error!(
                "Feedback for room {} failed: {:?}",
                payload.interview_request_id, e
            ),
        }
        outcome.map(|()| payload)
    }
}

/// Checks the required identifiers in order (room, candidate, interviewer) and builds the
/// wire payload.
pub fn build_payload(
    wizard: &FeedbackWizard,
    room_key: Option<&RoomKey>,
    identity: &ParticipantIdentity,
) -> CoreResult<FeedbackPayload> {
    let room_key = room_key.ok_or(CoreError::MissingRoomId)?;
    let candidate_id = identity
        .external_candidate_id
        .clone()
        .ok_or(CoreError::MissingCandidateId)?;
    let interviewer_id = identity
        .external_interviewer_id
        .clone()
        .ok_or(CoreError::MissingInterviewerId)?;

    let state = wizard.state();
    Ok(FeedbackPayload {
        candidate_id,
        interviewer_id,
        interview_request_id: room_key.to_string(),
        user_type: wizard.question_set().user_type().as_str().to_string(),
        feedback: FeedbackBody {
            questions: wizard.answered_questions(),
            overall_rating: state.overall_rating.to_string(),
            additional_notes: state.additional_notes.trim().to_string(),
        },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn classify(result: Result<TransportReply, TransportFailure>) -> CoreResult<()> {
    match result {
        Ok(TransportReply { status: 200 | 201, .. }) => Ok(()),
        // Any other 2xx is not an acknowledgement we recognise.
        Ok(TransportReply { status, .. }) if (200..300).contains(&status) => Err(
            CoreError::UnknownSubmitFailure(format!("unexpected status {status}")),
        ),
        Ok(TransportReply { status, body }) => {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .unwrap_or("Server error")
                .to_string();
            Err(CoreError::ServerRejected { status, message })
        }
        Err(TransportFailure::NoResponse(reason)) => Err(CoreError::NetworkUnreachable(reason)),
        Err(TransportFailure::Other(reason)) => Err(CoreError::UnknownSubmitFailure(reason)),
    }
}
