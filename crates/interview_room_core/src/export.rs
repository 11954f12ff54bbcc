//! crates/interview_room_core/src/export.rs
//!
//! Offline record of a wizard's answers as a downloadable JSON document.

use crate::domain::{FeedbackBody, FeedbackPayload, ParticipantIdentity, RoomKey};
use crate::room_key::normalize_display_name;
use crate::wizard::FeedbackWizard;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// The payload shape plus a `candidateName` heading the download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackExport {
    /// The name the form was opened under, or "Candidate" when the link carried none.
    pub candidate_name: String,
    #[serde(flatten)]
    pub payload: FeedbackPayload,
}

impl FeedbackExport {
    /// Unlike a submission, an export never fails on missing identifiers; they are left blank.
    pub fn from_wizard(
        wizard: &FeedbackWizard,
        room_key: &RoomKey,
        identity: &ParticipantIdentity,
    ) -> Self {
        let state = wizard.state();
        Self {
            candidate_name: identity
                .display_name
                .clone()
                .unwrap_or_else(|| "Candidate".to_string()),
            payload: FeedbackPayload {
                candidate_id: identity.external_candidate_id.clone().unwrap_or_default(),
                interviewer_id: identity.external_interviewer_id.clone().unwrap_or_default(),
                interview_request_id: room_key.to_string(),
                user_type: wizard.question_set().user_type().as_str().to_string(),
                feedback: FeedbackBody {
                    questions: wizard.answered_questions(),
                    overall_rating: state.overall_rating.to_string(),
                    additional_notes: state.additional_notes.clone(),
                },
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }

    /// `feedback-<name>-<room>.json`, with the name reduced to a safe slug.
    pub fn file_name(&self) -> String {
        let name = match normalize_display_name(&self.candidate_name) {
            slug if slug.is_empty() => "participant".to_string(),
            slug => slug,
        };
        format!("feedback-{}-{}.json", name, self.payload.interview_request_id)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::questions::QuestionSet;

    #[test]
    fn export_carries_the_name_and_payload_fields() {
        let mut wizard = FeedbackWizard::new(QuestionSet::for_role(Role::Interviewer));
        wizard.set_rating(5).unwrap();
        let identity =
            ParticipantIdentity::from_params(Some("interviewer"), Some("Sam Lee"), None, Some("int-3"));
        let export =
            FeedbackExport::from_wizard(&wizard, &RoomKey::parse("room-1-sam").unwrap(), &identity);

        assert_eq!(export.file_name(), "feedback-sam-lee-room-1-sam.json");
        let json: serde_json::Value =
            serde_json::from_str(&export.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json["candidateName"], "Sam Lee");
        assert!(json.get("displayName").is_none());
        assert_eq!(json["candidateId"], "");
        assert_eq!(json["interviewerId"], "int-3");
        assert_eq!(json["userType"], "interviewer");
        assert_eq!(json["feedback"]["overallRating"], "5");
        assert_eq!(json["feedback"]["questions"].as_array().unwrap().len(), 14);
    }

    #[test]
    fn unnamed_exports_fall_back_to_candidate() {
        let wizard = FeedbackWizard::new(QuestionSet::for_role(Role::Interviewer));
        let identity = ParticipantIdentity::from_params(Some("interviewer"), None, None, None);
        let export =
            FeedbackExport::from_wizard(&wizard, &RoomKey::parse("room-1-sam").unwrap(), &identity);

        assert_eq!(export.candidate_name, "Candidate");
        assert_eq!(export.file_name(), "feedback-candidate-room-1-sam.json");
    }
}
