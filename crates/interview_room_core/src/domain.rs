//! crates/interview_room_core/src/domain.rs
//!
//! Defines the core data structures shared by the room and feedback flows.
//! Only the wire payload types carry serde derives; everything else is plain data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The two participant roles. `Unspecified` covers entries that carry no `usertype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Interviewer,
    Candidate,
    #[default]
    Unspecified,
}

impl Role {
    /// Parses the `usertype` navigation parameter. Anything unrecognised is `Unspecified`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("interviewer") => Role::Interviewer,
            Some(v) if v.eq_ignore_ascii_case("candidate") => Role::Candidate,
            _ => Role::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Interviewer => "interviewer",
            Role::Candidate => "candidate",
            Role::Unspecified => "unspecified",
        }
    }
}

/// Canonical identifier used to request the same room across independent entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomKey(String);

impl RoomKey {
    /// Wraps a key that arrived already-derived, e.g. from a `/meeting/{key}` path segment.
    /// Returns `None` for blank input or anything outside `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        is_key_segment(trimmed).then(|| Self(trimmed.to_string()))
    }

    pub(crate) fn from_derived(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keys travel as single URL path segments, here and at the video provider.
pub(crate) fn is_key_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata handed to the provider when a room has to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMetadata {
    pub starts_at: DateTime<Utc>,
    pub custom: BTreeMap<String, String>,
}

impl RoomMetadata {
    /// Metadata for a room starting now with no custom fields.
    pub fn starting_now() -> Self {
        Self {
            starts_at: Utc::now(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.custom.insert(name.to_string(), value.into());
        self
    }
}

/// A room instance as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomHandle {
    pub key: RoomKey,
    pub created_at: DateTime<Utc>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub custom: BTreeMap<String, String>,
}

/// Who is entering a room, built once from the inbound navigation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParticipantIdentity {
    pub role: Role,
    pub display_name: Option<String>,
    pub external_candidate_id: Option<String>,
    pub external_interviewer_id: Option<String>,
}

impl ParticipantIdentity {
    /// Builds an identity from raw query values; blank strings count as absent.
    pub fn from_params(
        usertype: Option<&str>,
        name: Option<&str>,
        candidate_id: Option<&str>,
        interviewer_id: Option<&str>,
    ) -> Self {
        Self {
            role: Role::from_param(usertype),
            display_name: non_blank(name),
            external_candidate_id: non_blank(candidate_id),
            external_interviewer_id: non_blank(interviewer_id),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A single multiple-choice evaluation question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDefinition {
    pub id: &'static str,
    pub prompt_text: &'static str,
    pub answer_choices: [&'static str; 4],
}

//=========================================================================================
// Wire Payloads
//=========================================================================================

/// The body POSTed to the feedback endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub candidate_id: String,
    pub interviewer_id: String,
    pub interview_request_id: String,
    pub user_type: String,
    pub feedback: FeedbackBody,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBody {
    pub questions: Vec<AnsweredQuestion>,
    pub overall_rating: String,
    pub additional_notes: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
}
