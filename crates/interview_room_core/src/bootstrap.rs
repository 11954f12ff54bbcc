//! crates/interview_room_core/src/bootstrap.rs
//!
//! Room entry: acquire the room, then decide whether a display name has to be collected
//! before the participant may continue into the call.

use crate::domain::{ParticipantIdentity, RoomHandle, RoomKey, RoomMetadata};
use crate::error::{CoreError, CoreResult};
use crate::room_session::RoomSession;
use crate::routing::NavigationTarget;
use std::sync::{Arc, RwLock};
use tracing::info;

pub const DEFAULT_PARTICIPANT_NAME: &str = "Anonymous User";

/// Holds the name used to label the local participant in the room UI.
///
/// Created once when the application starts (at `DEFAULT_PARTICIPANT_NAME`) and handed to
/// the bootstrap explicitly. Clones share the same value. It is never reset per entry.
#[derive(Debug, Clone)]
pub struct ParticipantContext {
    name: Arc<RwLock<String>>,
}

impl Default for ParticipantContext {
    fn default() -> Self {
        Self {
            name: Arc::new(RwLock::new(DEFAULT_PARTICIPANT_NAME.to_string())),
        }
    }
}

impl ParticipantContext {
    pub fn current_name(&self) -> String {
        self.name
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_name(&self, name: &str) {
        let mut guard = self
            .name
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = name.to_string();
    }
}

/// The `action` navigation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Join,
    Unspecified,
}

impl EntryAction {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("join") => EntryAction::Join,
            _ => EntryAction::Unspecified,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub handle: RoomHandle,
    /// When true, room entry is deferred until `supply_name` succeeds.
    pub needs_name_input: bool,
    pub participant_name: String,
}

#[derive(Clone)]
pub struct SessionBootstrap {
    rooms: RoomSession,
    context: ParticipantContext,
}

impl SessionBootstrap {
    pub fn new(rooms: RoomSession, context: ParticipantContext) -> Self {
        Self { rooms, context }
    }

    pub fn context(&self) -> &ParticipantContext {
        &self.context
    }

    pub async fn enter(
        &self,
        identity: &ParticipantIdentity,
        action: EntryAction,
        key: &RoomKey,
    ) -> CoreResult<BootstrapOutcome> {
        let handle = self
            .rooms
            .acquire_or_create(key, &RoomMetadata::starting_now())
            .await?;

        let needs_name_input = match (&identity.display_name, action) {
            (Some(name), _) => {
                self.context.set_name(name);
                false
            }
            // Explicit join without a name.
            (None, EntryAction::Join) => true,
            // Ambiguous entry: never fall back to an anonymous identity silently.
            (None, EntryAction::Unspecified) => true,
        };

        info!(
            "Participant entering room {} as {} (name prompt: {})",
            key,
            identity.role.as_str(),
            needs_name_input
        );

        Ok(BootstrapOutcome {
            handle,
            needs_name_input,
            participant_name: self.context.current_name(),
        })
    }

    /// Completes a deferred entry with a typed-in name and returns where to resume.
    pub fn supply_name(&self, key: &RoomKey, name: &str) -> CoreResult<NavigationTarget> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid("Please enter your name to join the meeting"));
        }
        self.context.set_name(name);
        Ok(NavigationTarget::Meeting {
            room_key: key.clone(),
            name: Some(name.to_string()),
            action_join: false,
            personal: false,
        })
    }
}
