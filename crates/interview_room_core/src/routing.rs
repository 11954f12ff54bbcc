//! crates/interview_room_core/src/routing.rs
//!
//! Navigation targets and the end-of-call routing decision.

use crate::domain::{ParticipantIdentity, RoomKey, Role};
use std::time::Duration;
use url::form_urlencoded;

/// Delay before a successful feedback submission navigates away. Cosmetic only.
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Home,
    /// Home with the "feedback submitted" notice.
    FeedbackSubmitted,
    Meeting {
        room_key: RoomKey,
        name: Option<String>,
        action_join: bool,
        personal: bool,
    },
    Feedback {
        room_key: RoomKey,
        name: String,
        candidate_id: Option<String>,
        interviewer_id: Option<String>,
    },
}

impl NavigationTarget {
    /// Renders the target as an app-relative path with an encoded query string.
    pub fn to_path(&self) -> String {
        match self {
            NavigationTarget::Home => "/".to_string(),
            NavigationTarget::FeedbackSubmitted => "/?feedback=submitted".to_string(),
            NavigationTarget::Meeting {
                room_key,
                name,
                action_join,
                personal,
            } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if *personal {
                    query.append_pair("personal", "true");
                }
                if let Some(name) = name {
                    query.append_pair("name", name);
                }
                if *action_join {
                    query.append_pair("action", "join");
                }
                with_query(format!("/meeting/{room_key}"), query.finish())
            }
            NavigationTarget::Feedback {
                room_key,
                name,
                candidate_id,
                interviewer_id,
            } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                query.append_pair("name", name);
                query.append_pair("usertype", Role::Candidate.as_str());
                if let Some(id) = candidate_id {
                    query.append_pair("candidateId", id);
                }
                if let Some(id) = interviewer_id {
                    query.append_pair("interviewerId", id);
                }
                with_query(format!("/feedback/{room_key}"), query.finish())
            }
        }
    }
}

fn with_query(path: String, query: String) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    }
}

/// The two controls that end a call for the local participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMode {
    Leave,
    EndForEveryone,
}

/// The routing decision plus whether the room itself must be ended at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub target: NavigationTarget,
    pub end_room: bool,
}

/// Captures the identity present at room entry and decides, once, where the participant
/// goes when the call ends. `resolve` consumes the router so the decision cannot be re-made.
#[derive(Debug, Clone)]
pub struct CallTerminationRouter {
    identity: ParticipantIdentity,
    room_key: RoomKey,
}

impl CallTerminationRouter {
    pub fn at_entry(identity: ParticipantIdentity, room_key: RoomKey) -> Self {
        Self { identity, room_key }
    }

    pub fn resolve(self, mode: EndMode) -> Termination {
        Termination {
            target: resolve_target(&self.identity, &self.room_key),
            end_room: mode == EndMode::EndForEveryone,
        }
    }
}

/// Candidates go to the feedback screen for this room; everyone else goes home.
/// Interviewers give their feedback from the in-room sidebar instead.
pub fn resolve_target(identity: &ParticipantIdentity, room_key: &RoomKey) -> NavigationTarget {
    match identity.role {
        Role::Candidate => NavigationTarget::Feedback {
            room_key: room_key.clone(),
            name: identity
                .display_name
                .clone()
                .unwrap_or_else(|| "Candidate".to_string()),
            candidate_id: identity.external_candidate_id.clone(),
            interviewer_id: identity.external_interviewer_id.clone(),
        },
        Role::Interviewer | Role::Unspecified => NavigationTarget::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RoomKey {
        RoomKey::parse("room-64f1c2-sam-lee").unwrap()
    }

    #[test]
    fn candidate_ending_a_call_goes_to_feedback_with_entry_ids() {
        let identity = ParticipantIdentity::from_params(
            Some("candidate"),
            Some("Sam Lee"),
            Some("cand-7"),
            Some("int-3"),
        );
        let termination = CallTerminationRouter::at_entry(identity, key()).resolve(EndMode::Leave);
        assert!(!termination.end_room);
        assert_eq!(
            termination.target,
            NavigationTarget::Feedback {
                room_key: key(),
                name: "Sam Lee".into(),
                candidate_id: Some("cand-7".into()),
                interviewer_id: Some("int-3".into()),
            }
        );
        assert_eq!(
            termination.target.to_path(),
            "/feedback/room-64f1c2-sam-lee?name=Sam+Lee&usertype=candidate&candidateId=cand-7&interviewerId=int-3"
        );
    }

    #[test]
    fn interviewer_ending_a_call_goes_home() {
        let identity = ParticipantIdentity::from_params(
            Some("interviewer"),
            Some("Pat"),
            Some("cand-7"),
            Some("int-3"),
        );
        let termination =
            CallTerminationRouter::at_entry(identity, key()).resolve(EndMode::EndForEveryone);
        assert!(termination.end_room);
        assert_eq!(termination.target, NavigationTarget::Home);
        assert_eq!(termination.target.to_path(), "/");
    }

    #[test]
    fn unnamed_candidate_is_labelled_candidate() {
        let identity = ParticipantIdentity::from_params(Some("candidate"), None, None, None);
        assert_eq!(
            resolve_target(&identity, &key()).to_path(),
            "/feedback/room-64f1c2-sam-lee?name=Candidate&usertype=candidate"
        );
    }

    #[test]
    fn meeting_paths_carry_only_present_flags() {
        let adhoc = NavigationTarget::Meeting {
            room_key: key(),
            name: None,
            action_join: true,
            personal: false,
        };
        assert_eq!(adhoc.to_path(), "/meeting/room-64f1c2-sam-lee?action=join");

        let personal = NavigationTarget::Meeting {
            room_key: key(),
            name: Some("Jane".into()),
            action_join: false,
            personal: true,
        };
        assert_eq!(
            personal.to_path(),
            "/meeting/room-64f1c2-sam-lee?personal=true&name=Jane"
        );
    }
}
