//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for room acquisition and meeting entry/exit, and the
//! master definition for the OpenAPI specification.

use crate::error::reject;
use crate::web::feedback;
use crate::web::protocol::{
    EndCallRequest, EndCallResponse, EntryParams, InstantRoomRequest, MeetingEntryResponse,
    NavigationResponse, PersonalRoomRequest, RoomCreatedResponse, RoomView, SupplyNameRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use interview_room_core::{
    derive_key, CallTerminationRouter, CoreError, EntryAction, NavigationTarget, RoomHandle,
    RoomKey, RoomKeyRequest, RoomMetadata,
};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

/// Description stored on instant meetings created without one.
const INSTANT_MEETING_DESCRIPTION: &str = "Instant Meeting";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_personal_room_handler,
        create_instant_room_handler,
        deep_link_handler,
        enter_meeting_handler,
        supply_name_handler,
        end_call_handler,
        feedback::open_session_handler,
        feedback::get_session_handler,
        feedback::select_answer_handler,
        feedback::set_rating_handler,
        feedback::set_notes_handler,
        feedback::next_step_handler,
        feedback::previous_step_handler,
        feedback::submit_handler,
        feedback::export_handler,
        feedback::abandon_handler,
        feedback::receive_feedback_handler,
    ),
    components(
        schemas(
            PersonalRoomRequest,
            InstantRoomRequest,
            RoomView,
            RoomCreatedResponse,
            MeetingEntryResponse,
            SupplyNameRequest,
            EndCallRequest,
            EndCallResponse,
            NavigationResponse,
            crate::web::protocol::EndCallMode,
            crate::web::protocol::WizardView,
            crate::web::protocol::QuestionView,
            crate::web::protocol::SelectAnswerRequest,
            crate::web::protocol::RatingRequest,
            crate::web::protocol::NotesRequest,
            crate::web::protocol::SubmitResponse,
            crate::web::protocol::ReceivedFeedback,
        )
    ),
    tags(
        (name = "Interview Rooms API", description = "Video rooms for interviews and the post-call feedback wizard.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_room_key(raw: &str) -> Result<RoomKey, (StatusCode, String)> {
    RoomKey::parse(raw)
        .ok_or_else(|| reject(CoreError::InvalidInput("a room key is required".to_string())))
}

fn created(app_state: &AppState, handle: RoomHandle, target: NavigationTarget) -> RoomCreatedResponse {
    let join_path = target.to_path();
    RoomCreatedResponse {
        join_url: format!("{}{}", app_state.config.public_base_url, join_path),
        join_path,
        room: handle.into(),
    }
}

//=========================================================================================
// Room Acquisition Handlers
//=========================================================================================

/// Get or create the reusable personal room for a display name.
///
/// Calling this repeatedly with the same name always lands in the same room.
#[utoipa::path(
    post,
    path = "/rooms/personal",
    request_body = PersonalRoomRequest,
    responses(
        (status = 200, description = "The personal room", body = RoomCreatedResponse),
        (status = 400, description = "The display name has no usable characters"),
        (status = 503, description = "The video provider could not produce the room")
    )
)]
pub async fn create_personal_room_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<PersonalRoomRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = derive_key(RoomKeyRequest::Personal {
        display_name: &payload.display_name,
    })
    .map_err(reject)?;

    let handle = app_state
        .rooms
        .acquire_or_create(&key, &RoomMetadata::starting_now())
        .await
        .map_err(reject)?;

    let target = NavigationTarget::Meeting {
        room_key: key,
        name: Some(payload.display_name.trim().to_string()),
        action_join: false,
        personal: true,
    };
    Ok(Json(created(&app_state, handle, target)))
}

/// Create an instant or scheduled meeting under a fresh key.
#[utoipa::path(
    post,
    path = "/rooms/instant",
    request_body = InstantRoomRequest,
    responses(
        (status = 201, description = "The new meeting", body = RoomCreatedResponse),
        (status = 503, description = "The video provider could not produce the room")
    )
)]
pub async fn create_instant_room_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<InstantRoomRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = derive_key(RoomKeyRequest::Adhoc).map_err(reject)?;

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let mut metadata = RoomMetadata::starting_now().with_field(
        "description",
        description.unwrap_or(INSTANT_MEETING_DESCRIPTION),
    );
    if let Some(starts_at) = payload.starts_at {
        metadata.starts_at = starts_at;
    }

    let handle = app_state
        .rooms
        .acquire_or_create(&key, &metadata)
        .await
        .map_err(reject)?;
    info!("Created meeting {}", key);

    // A described meeting is scheduled and shared; an undescribed one is joined right away.
    let target = NavigationTarget::Meeting {
        room_key: key,
        name: None,
        action_join: description.is_none(),
        personal: false,
    };
    Ok((StatusCode::CREATED, Json(created(&app_state, handle, target))))
}

/// Resolve an invitation link for an external interview record.
#[utoipa::path(
    get,
    path = "/link/{record_id}/{user_name}",
    responses(
        (status = 200, description = "The invited room", body = RoomCreatedResponse),
        (status = 400, description = "The link is malformed; navigation should be abandoned"),
        (status = 503, description = "The video provider could not produce the room")
    ),
    params(
        ("record_id" = String, Path, description = "The external interview record id."),
        ("user_name" = String, Path, description = "The invited participant's display name.")
    )
)]
pub async fn deep_link_handler(
    State(app_state): State<Arc<AppState>>,
    Path((record_id, user_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = derive_key(RoomKeyRequest::DeepLink {
        record_id: &record_id,
        display_name: &user_name,
    })
    .map_err(|e| {
        warn!("Rejecting invitation link {}/{}: {}", record_id, user_name, e);
        reject(e)
    })?;

    let metadata = RoomMetadata::starting_now()
        .with_field("mongoId", record_id.trim())
        .with_field("created_for", user_name.trim());
    let handle = app_state
        .rooms
        .acquire_or_create(&key, &metadata)
        .await
        .map_err(reject)?;

    let target = NavigationTarget::Meeting {
        room_key: key,
        name: Some(user_name.trim().to_string()),
        action_join: false,
        personal: false,
    };
    Ok(Json(created(&app_state, handle, target)))
}

//=========================================================================================
// Meeting Entry and Exit Handlers
//=========================================================================================

/// Enter a meeting room from a link.
///
/// When no name is known the room is still prepared, but `needs_name_input` tells the
/// client to collect one before joining.
#[utoipa::path(
    get,
    path = "/meeting/{room_key}",
    responses(
        (status = 200, description = "The room is ready", body = MeetingEntryResponse),
        (status = 400, description = "Missing room key"),
        (status = 503, description = "The room could not be acquired")
    ),
    params(
        ("room_key" = String, Path, description = "The room key."),
        EntryParams
    )
)]
pub async fn enter_meeting_handler(
    State(app_state): State<Arc<AppState>>,
    Path(room_key): Path<String>,
    Query(params): Query<EntryParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = parse_room_key(&room_key)?;
    let identity = params.identity();
    let outcome = app_state
        .bootstrap
        .enter(&identity, EntryAction::from_param(params.action.as_deref()), &key)
        .await
        .map_err(reject)?;

    Ok(Json(MeetingEntryResponse {
        room: outcome.handle.into(),
        needs_name_input: outcome.needs_name_input,
        participant_name: outcome.participant_name,
        role: identity.role.as_str().to_string(),
    }))
}

/// Complete a deferred entry with a typed-in name.
#[utoipa::path(
    post,
    path = "/meeting/{room_key}/name",
    request_body = SupplyNameRequest,
    responses(
        (status = 200, description = "Where to resume", body = NavigationResponse),
        (status = 400, description = "Blank name or room key")
    ),
    params(("room_key" = String, Path, description = "The room key."))
)]
pub async fn supply_name_handler(
    State(app_state): State<Arc<AppState>>,
    Path(room_key): Path<String>,
    Json(payload): Json<SupplyNameRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = parse_room_key(&room_key)?;
    let target = app_state
        .bootstrap
        .supply_name(&key, &payload.name)
        .map_err(reject)?;
    Ok(Json(NavigationResponse::now(&target)))
}

/// Leave the call, or end it for everyone, and get the post-call destination.
///
/// Candidates are always sent to the feedback form; everyone else goes home. A refused
/// "end for everyone" still routes the caller, with `room_ended` set to false.
#[utoipa::path(
    post,
    path = "/meeting/{room_key}/end",
    request_body = EndCallRequest,
    responses(
        (status = 200, description = "Post-call destination", body = EndCallResponse),
        (status = 400, description = "Missing room key")
    ),
    params(
        ("room_key" = String, Path, description = "The room key."),
        EntryParams
    )
)]
pub async fn end_call_handler(
    State(app_state): State<Arc<AppState>>,
    Path(room_key): Path<String>,
    Query(params): Query<EntryParams>,
    Json(payload): Json<EndCallRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = parse_room_key(&room_key)?;
    let termination =
        CallTerminationRouter::at_entry(params.identity(), key.clone()).resolve(payload.mode.into());

    let mut room_ended = false;
    if termination.end_room {
        match app_state.rooms.end_for_everyone(&key).await {
            Ok(()) => room_ended = true,
            Err(e) => warn!("Could not end room {} for everyone: {}", key, e),
        }
    }

    Ok(Json(EndCallResponse {
        navigation: NavigationResponse::now(&termination.target),
        room_ended,
    }))
}
