//! services/api/src/web/feedback.rs
//!
//! Handlers driving the post-call feedback wizard, from opening a form to submitting it,
//! plus the local endpoint that accepts submissions when no external feedback API is set.

use crate::error::reject;
use crate::web::protocol::{
    EntryParams, NotesRequest, RatingRequest, ReceivedFeedback, SelectAnswerRequest,
    SubmitResponse, WizardView,
};
use crate::web::state::{AppState, FeedbackSession};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use interview_room_core::routing::SUCCESS_REDIRECT_DELAY;
use interview_room_core::{CoreError, CoreResult, FeedbackExport, FeedbackWizard, RoomKey};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

type HandlerError = (StatusCode, String);

//=========================================================================================
// Helpers
//=========================================================================================

async fn load(app_state: &AppState, id: Uuid) -> Result<Arc<Mutex<FeedbackSession>>, HandlerError> {
    app_state
        .feedback_session(id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Feedback session {id} not found")))
}

/// Applies one wizard edit under the session lock and returns the updated view.
async fn edit<F>(app_state: &AppState, id: Uuid, apply: F) -> Result<Json<WizardView>, HandlerError>
where
    F: FnOnce(&mut FeedbackWizard) -> CoreResult<()>,
{
    let entry = load(app_state, id).await?;
    let mut session = entry.lock().await;
    apply(&mut session.wizard).map_err(reject)?;
    Ok(Json(WizardView::of(id, &session)))
}

//=========================================================================================
// Wizard Handlers
//=========================================================================================

/// Open a feedback form for a room.
///
/// The question set follows `usertype`: interviewers get the interviewer set, everyone
/// else the candidate set.
#[utoipa::path(
    post,
    path = "/feedback/{room_key}/sessions",
    responses(
        (status = 201, description = "Feedback form opened on its welcome step", body = WizardView)
    ),
    params(
        ("room_key" = String, Path, description = "The room the feedback is about."),
        EntryParams
    )
)]
pub async fn open_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(room_key): Path<String>,
    Query(params): Query<EntryParams>,
) -> impl IntoResponse {
    let (id, entry) = app_state
        .open_feedback_session(FeedbackSession::new(
            RoomKey::parse(&room_key),
            params.identity(),
        ))
        .await;
    let session = entry.lock().await;
    info!(
        "Opened {} feedback form {} for room {}",
        session.wizard.question_set().user_type().as_str(),
        id,
        room_key
    );
    (StatusCode::CREATED, Json(WizardView::of(id, &session)))
}

#[utoipa::path(
    get,
    path = "/feedback/sessions/{id}",
    responses(
        (status = 200, description = "Current wizard step", body = WizardView),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let entry = load(&app_state, id).await?;
    let session = entry.lock().await;
    Ok(Json(WizardView::of(id, &session)))
}

/// Record the answer to one question. Selecting again replaces the earlier answer.
#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/answers",
    request_body = SelectAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = WizardView),
        (status = 400, description = "Unknown question or answer choice"),
        (status = 404, description = "Unknown feedback session"),
        (status = 409, description = "A submission is in flight")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn select_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    edit(&app_state, id, |wizard| {
        wizard.select_answer(&payload.question_id, &payload.answer)
    })
    .await
}

#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/rating",
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = WizardView),
        (status = 400, description = "Rating outside 1 to 5"),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn set_rating_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RatingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    edit(&app_state, id, |wizard| match u8::try_from(payload.rating) {
        Ok(rating) => wizard.set_rating(rating),
        Err(_) => Err(CoreError::InvalidInput(format!(
            "rating must be between 1 and 5, got {}",
            payload.rating
        ))),
    })
    .await
}

#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/notes",
    request_body = NotesRequest,
    responses(
        (status = 200, description = "Notes recorded", body = WizardView),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn set_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NotesRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    edit(&app_state, id, |wizard| wizard.set_notes(&payload.notes)).await
}

/// Advance one step. Does nothing when the current step is incomplete or final.
#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/next",
    responses(
        (status = 200, description = "Current wizard step", body = WizardView),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn next_step_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    edit(&app_state, id, |wizard| {
        wizard.next();
        Ok(())
    })
    .await
}

/// Go back one step. Does nothing on the welcome step.
#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/previous",
    responses(
        (status = 200, description = "Current wizard step", body = WizardView),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn previous_step_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    edit(&app_state, id, |wizard| {
        wizard.previous();
        Ok(())
    })
    .await
}

/// Submit the form once, from its last step.
///
/// A second submit while the first is in flight is refused with 409. On failure the
/// form stays on its final step with the error shown as a banner and can be retried.
#[utoipa::path(
    post,
    path = "/feedback/sessions/{id}/submit",
    responses(
        (status = 200, description = "Submitted; navigate after the given delay", body = SubmitResponse),
        (status = 400, description = "Not on the last step, no rating, or room, candidate or interviewer id missing"),
        (status = 404, description = "Unknown feedback session"),
        (status = 409, description = "A submission is already in flight"),
        (status = 410, description = "The form was abandoned while submitting"),
        (status = 500, description = "The delivery task died; the form can be retried"),
        (status = 502, description = "The feedback service rejected or did not answer")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn submit_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let entry = load(&app_state, id).await?;

    // --- 1. Mark the form as submitting and take a snapshot, then release the lock ---
    let (snapshot, room_key, identity, cancellation_token) = {
        let mut session = entry.lock().await;
        session.wizard.begin_submission().map_err(reject)?;
        (
            session.wizard.clone(),
            session.room_key.clone(),
            session.identity.clone(),
            session.cancellation_token.clone(),
        )
    };

    // --- 2. Deliver on a task of its own; the outcome is recorded even if this request goes away ---
    let delivery = tokio::spawn({
        let app_state = app_state.clone();
        let entry = entry.clone();
        async move {
            let outcome = app_state
                .submitter
                .submit(&snapshot, room_key.as_ref(), &identity)
                .await;

            if cancellation_token.is_cancelled() {
                warn!("Discarding submission result for abandoned feedback form {}", id);
                return None;
            }

            let mut session = entry.lock().await;
            session.wizard.finish_submission(&outcome);
            let view = WizardView::of(id, &session);
            match &outcome {
                Ok(payload) => {
                    info!(
                        "Feedback form {} submitted for room {}",
                        id, payload.interview_request_id
                    );
                    app_state.evict_after(id, SUCCESS_REDIRECT_DELAY);
                }
                Err(e) => error!("Feedback form {} failed to submit: {}", id, e),
            }
            Some(outcome.map(|_| view))
        }
    });

    // --- 3. Answer with whatever the delivery recorded ---
    match delivery.await {
        Ok(Some(Ok(view))) => Ok(Json(SubmitResponse::succeeded(view))),
        Ok(Some(Err(e))) => Err(reject(e)),
        Ok(None) => Err((StatusCode::GONE, "Feedback form was closed".to_string())),
        Err(join_error) => {
            error!("Feedback delivery for form {} aborted: {}", id, join_error);
            let failure: CoreResult<()> =
                Err(CoreError::UnknownSubmitFailure(join_error.to_string()));
            entry.lock().await.wizard.finish_submission(&failure);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit feedback: Please try again.".to_string(),
            ))
        }
    }
}

/// Download the form's current answers as a JSON file.
#[utoipa::path(
    get,
    path = "/feedback/sessions/{id}/export",
    responses(
        (status = 200, description = "JSON attachment", body = String, content_type = "application/json"),
        (status = 400, description = "The form has no room key"),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn export_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let entry = load(&app_state, id).await?;
    let session = entry.lock().await;
    let room_key = session
        .room_key
        .as_ref()
        .ok_or_else(|| reject(CoreError::MissingRoomId))?;

    let export = FeedbackExport::from_wizard(&session.wizard, room_key, &session.identity);
    let body = export.to_pretty_json().map_err(|e| {
        error!("Failed to serialize feedback export: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to export feedback".to_string(),
        )
    })?;

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name()),
        ),
    ];
    Ok((headers, body))
}

/// Abandon the form. A submission still in flight has its result discarded.
#[utoipa::path(
    delete,
    path = "/feedback/sessions/{id}",
    responses(
        (status = 204, description = "Form closed"),
        (status = 404, description = "Unknown feedback session")
    ),
    params(("id" = Uuid, Path, description = "The feedback session id."))
)]
pub async fn abandon_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    if app_state.close_feedback_session(id).await {
        info!("Feedback form {} abandoned", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("Feedback session {id} not found")))
    }
}

//=========================================================================================
// Local Receiver
//=========================================================================================

/// Accept a feedback submission when no external feedback API is configured.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = ReceivedFeedback,
    responses(
        (status = 201, description = "Feedback stored"),
        (status = 422, description = "The body is not a feedback payload")
    )
)]
pub async fn receive_feedback_handler(Json(payload): Json<ReceivedFeedback>) -> impl IntoResponse {
    info!(
        "Received {} feedback for interview {} (candidate {}, interviewer {}) at {}",
        payload.user_type,
        payload.interview_request_id,
        payload.candidate_id,
        payload.interviewer_id,
        payload.timestamp
    );
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback received successfully" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRoomProvider;
    use crate::config::Config;
    use async_trait::async_trait;
    use interview_room_core::ports::{FeedbackTransport, TransportFailure, TransportReply};
    use interview_room_core::{ParticipantIdentity, SubmissionPhase};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers 500 after a second on the first call, and 201 straight away after that.
    struct FlakyTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedbackTransport for FlakyTransport {
        async fn post_json(
            &self,
            _endpoint: &str,
            _body: &Value,
        ) -> Result<TransportReply, TransportFailure> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                return Ok(TransportReply {
                    status: 500,
                    body: None,
                });
            }
            Ok(TransportReply {
                status: 201,
                body: None,
            })
        }
    }

    fn app_state() -> Arc<AppState> {
        let config = Config::from_lookup(|_| None).unwrap();
        Arc::new(AppState::new(
            Arc::new(config),
            Arc::new(InMemoryRoomProvider::new()),
            Arc::new(FlakyTransport {
                calls: AtomicUsize::new(0),
            }),
        ))
    }

    /// Opens a candidate form and walks it to the notes step.
    async fn ready_form(app_state: &AppState) -> Uuid {
        let identity =
            ParticipantIdentity::from_params(Some("candidate"), Some("Ana"), Some("c1"), Some("i1"));
        let (id, entry) = app_state
            .open_feedback_session(FeedbackSession::new(RoomKey::parse("room-r1-ana"), identity))
            .await;
        let mut session = entry.lock().await;
        let wizard = &mut session.wizard;
        wizard.next();
        while let Some(q) = wizard.current_question() {
            wizard.select_answer(q.id, q.answer_choices[0]).unwrap();
            wizard.next();
        }
        wizard.set_rating(4).unwrap();
        wizard.next();
        assert!(wizard.is_final_step());
        id
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submit_request_still_records_the_outcome() {
        let app_state = app_state();
        let id = ready_form(&app_state).await;
        let entry = app_state.feedback_session(id).await.unwrap();

        let request = submit_handler(State(app_state.clone()), Path(id));
        assert!(tokio::time::timeout(Duration::from_millis(100), request)
            .await
            .is_err());
        assert_eq!(entry.lock().await.wizard.phase(), &SubmissionPhase::Submitting);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(
            entry.lock().await.wizard.phase(),
            SubmissionPhase::Failed(_)
        ));

        let notes = set_notes_handler(
            State(app_state.clone()),
            Path(id),
            Json(NotesRequest {
                notes: "Second try".to_string(),
            }),
        )
        .await;
        assert!(notes.is_ok(), "the form is editable again");

        let retried = submit_handler(State(app_state.clone()), Path(id)).await;
        assert!(retried.is_ok());
        assert_eq!(entry.lock().await.wizard.phase(), &SubmissionPhase::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn submitting_early_is_refused() {
        let app_state = app_state();
        let (id, entry) = app_state
            .open_feedback_session(FeedbackSession::new(
                RoomKey::parse("room-r1-ana"),
                ParticipantIdentity::from_params(Some("candidate"), None, Some("c1"), Some("i1")),
            ))
            .await;

        let refused = submit_handler(State(app_state.clone()), Path(id)).await;
        assert_eq!(
            refused.err().map(|(status, _)| status),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(entry.lock().await.wizard.phase(), &SubmissionPhase::Editing);
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_forms_are_closed_after_the_redirect_delay() {
        let app_state = app_state();
        let id = ready_form(&app_state).await;

        // The first delivery fails slowly; the retry goes through.
        assert!(submit_handler(State(app_state.clone()), Path(id)).await.is_err());
        assert!(submit_handler(State(app_state.clone()), Path(id)).await.is_ok());
        assert_eq!(app_state.feedback_session_count().await, 1);

        tokio::time::sleep(SUCCESS_REDIRECT_DELAY + Duration::from_millis(10)).await;
        assert_eq!(app_state.feedback_session_count().await, 0);
    }
}
