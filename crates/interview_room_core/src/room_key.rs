//! crates/interview_room_core/src/room_key.rs
//!
//! Turns loosely-specified identity inputs into canonical room keys.
//!
//! Personal and deep-link keys are pure functions of their inputs. Ad-hoc keys are
//! random v4 UUIDs; their distinctness is probabilistic and nothing here checks for
//! collisions.

use crate::domain::{is_key_segment, RoomKey};
use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-]").expect("static regex"));

/// The three ways a room key can be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKeyRequest<'a> {
    /// A reusable room owned by a display name: `personal-<slug>`.
    Personal { display_name: &'a str },
    /// An invitation link for an external record: `room-<recordId>-<slug>`.
    DeepLink {
        record_id: &'a str,
        display_name: &'a str,
    },
    /// Instant or scheduled meetings.
    Adhoc,
}

/// Lowercases, trims, turns whitespace runs into a single hyphen and strips anything
/// outside `[a-z0-9-]`.
pub fn normalize_display_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG.replace_all(&hyphenated, "").into_owned()
}

pub fn derive_key(request: RoomKeyRequest<'_>) -> CoreResult<RoomKey> {
    match request {
        RoomKeyRequest::Personal { display_name } => {
            let slug = slug_for(display_name)?;
            Ok(RoomKey::from_derived(format!("personal-{slug}")))
        }
        RoomKeyRequest::DeepLink {
            record_id,
            display_name,
        } => {
            let record_id = record_id.trim();
            if record_id.is_empty() {
                return Err(CoreError::invalid("a record id is required"));
            }
            if !is_key_segment(record_id) {
                return Err(CoreError::invalid(format!(
                    "record id '{record_id}' may only contain letters, digits, '-' and '_'"
                )));
            }
            let slug = slug_for(display_name)?;
            Ok(RoomKey::from_derived(format!("room-{record_id}-{slug}")))
        }
        RoomKeyRequest::Adhoc => Ok(RoomKey::from_derived(Uuid::new_v4().to_string())),
    }
}

fn slug_for(display_name: &str) -> CoreResult<String> {
    if display_name.trim().is_empty() {
        return Err(CoreError::invalid("a display name is required"));
    }
    let slug = normalize_display_name(display_name);
    if slug.is_empty() {
        return Err(CoreError::invalid(format!(
            "display name '{display_name}' has no usable characters"
        )));
    }
    Ok(slug)
}
