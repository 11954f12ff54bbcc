//! services/api/src/web/protocol.rs
//!
//! Defines the JSON request and response bodies exchanged between the browser client
//! and the API server.

use crate::web::state::FeedbackSession;
use chrono::{DateTime, Utc};
use interview_room_core::routing::SUCCESS_REDIRECT_DELAY;
use interview_room_core::{
    EndMode, NavigationTarget, ParticipantIdentity, RoomHandle, Step, SubmissionPhase,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Navigation Parameters
//=========================================================================================

/// The query parameters every room and feedback link carries.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EntryParams {
    /// Display name, URL-encoded.
    pub name: Option<String>,
    /// `join` forces the name prompt when no name is present.
    pub action: Option<String>,
    /// `interviewer` or `candidate`.
    #[serde(rename = "usertype")]
    pub user_type: Option<String>,
    pub candidate_id: Option<String>,
    pub interviewer_id: Option<String>,
}

impl EntryParams {
    pub fn identity(&self) -> ParticipantIdentity {
        ParticipantIdentity::from_params(
            self.user_type.as_deref(),
            self.name.as_deref(),
            self.candidate_id.as_deref(),
            self.interviewer_id.as_deref(),
        )
    }
}

//=========================================================================================
// Rooms
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct PersonalRoomRequest {
    pub display_name: String,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct InstantRoomRequest {
    /// Without a description the meeting starts right away and the creator is sent in.
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

/// A room as returned to the client.
#[derive(Serialize, ToSchema, Debug)]
pub struct RoomView {
    pub room_key: String,
    pub created_at: DateTime<Utc>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub custom: BTreeMap<String, String>,
}

impl From<RoomHandle> for RoomView {
    fn from(handle: RoomHandle) -> Self {
        Self {
            room_key: handle.key.to_string(),
            created_at: handle.created_at,
            starts_at: handle.starts_at,
            ended_at: handle.ended_at,
            custom: handle.custom,
        }
    }
}

/// The response sent after a room has been acquired.
#[derive(Serialize, ToSchema, Debug)]
pub struct RoomCreatedResponse {
    pub room: RoomView,
    /// App-relative path to enter the room.
    pub join_path: String,
    /// Shareable absolute link.
    pub join_url: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct MeetingEntryResponse {
    pub room: RoomView,
    pub needs_name_input: bool,
    pub participant_name: String,
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SupplyNameRequest {
    pub name: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EndCallMode {
    Leave,
    EndForEveryone,
}

impl From<EndCallMode> for EndMode {
    fn from(mode: EndCallMode) -> Self {
        match mode {
            EndCallMode::Leave => EndMode::Leave,
            EndCallMode::EndForEveryone => EndMode::EndForEveryone,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct EndCallRequest {
    pub mode: EndCallMode,
}

/// Where the client should navigate next.
#[derive(Serialize, ToSchema, Debug, PartialEq)]
pub struct NavigationResponse {
    pub target: String,
    /// Present when the client should wait before navigating.
    pub redirect_after_ms: Option<u64>,
}

impl NavigationResponse {
    pub fn now(target: &NavigationTarget) -> Self {
        Self {
            target: target.to_path(),
            redirect_after_ms: None,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct EndCallResponse {
    pub navigation: NavigationResponse,
    /// False when "end for everyone" was requested but the provider refused.
    pub room_ended: bool,
}

//=========================================================================================
// Feedback Wizard
//=========================================================================================

#[derive(Serialize, ToSchema, Debug)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub selected_answer: Option<String>,
}

/// Everything the client needs to render the current wizard step.
#[derive(Serialize, ToSchema, Debug)]
pub struct WizardView {
    pub session_id: Uuid,
    pub room_key: Option<String>,
    pub user_type: String,
    pub participant_name: Option<String>,
    pub step_index: usize,
    pub total_steps: usize,
    /// `welcome`, `question`, `rating` or `notes`.
    pub step_kind: String,
    pub step_title: String,
    pub progress_percent: f64,
    pub can_proceed: bool,
    pub is_final_step: bool,
    pub question: Option<QuestionView>,
    pub answered_count: usize,
    pub question_count: usize,
    pub overall_rating: u8,
    pub additional_notes: String,
    /// `editing`, `submitting`, `succeeded` or `failed`.
    pub phase: String,
    pub error_banner: Option<String>,
}

impl WizardView {
    pub fn of(session_id: Uuid, session: &FeedbackSession) -> Self {
        let wizard = &session.wizard;
        let state = wizard.state();
        let step_kind = match wizard.current_step() {
            Step::Welcome => "welcome",
            Step::Question(_) => "question",
            Step::Rating => "rating",
            Step::Notes => "notes",
        };
        let (phase, error_banner) = match wizard.phase() {
            SubmissionPhase::Editing => ("editing", None),
            SubmissionPhase::Submitting => ("submitting", None),
            SubmissionPhase::Succeeded => ("succeeded", None),
            SubmissionPhase::Failed(message) => ("failed", Some(message.clone())),
        };
        Self {
            session_id,
            room_key: session.room_key.as_ref().map(ToString::to_string),
            user_type: wizard.question_set().user_type().as_str().to_string(),
            participant_name: session.identity.display_name.clone(),
            step_index: state.current_step_index,
            total_steps: wizard.total_steps(),
            step_kind: step_kind.to_string(),
            step_title: wizard.step_title(),
            progress_percent: wizard.progress_percent(),
            can_proceed: wizard.can_proceed(),
            is_final_step: wizard.is_final_step(),
            question: wizard.current_question().map(|q| QuestionView {
                id: q.id.to_string(),
                prompt: q.prompt_text.to_string(),
                choices: q.answer_choices.iter().map(|c| c.to_string()).collect(),
                selected_answer: state.selected_answers.get(q.id).cloned(),
            }),
            answered_count: state.selected_answers.len(),
            question_count: wizard.question_set().questions().len(),
            overall_rating: state.overall_rating,
            additional_notes: state.additional_notes.clone(),
            phase: phase.to_string(),
            error_banner,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SelectAnswerRequest {
    pub question_id: String,
    pub answer: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RatingRequest {
    /// 1 to 5.
    pub rating: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct SubmitResponse {
    pub view: WizardView,
    pub navigation: NavigationResponse,
}

impl SubmitResponse {
    pub fn succeeded(view: WizardView) -> Self {
        Self {
            view,
            navigation: NavigationResponse {
                target: NavigationTarget::FeedbackSubmitted.to_path(),
                redirect_after_ms: Some(SUCCESS_REDIRECT_DELAY.as_millis() as u64),
            },
        }
    }
}

/// What the local fallback endpoint accepts; the same shape the submitter sends.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedFeedback {
    pub candidate_id: String,
    pub interviewer_id: String,
    pub interview_request_id: String,
    pub user_type: String,
    #[schema(value_type = Object)]
    pub feedback: serde_json::Value,
    pub timestamp: String,
}
