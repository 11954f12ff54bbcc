pub mod feedback;
pub mod protocol;
pub mod rest;
pub mod state;

use crate::error::ApiError;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router, including the Swagger UI.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let room_routes = Router::new()
        .route("/rooms/personal", post(rest::create_personal_room_handler))
        .route("/rooms/instant", post(rest::create_instant_room_handler))
        .route("/link/{record_id}/{user_name}", get(rest::deep_link_handler))
        .route("/meeting/{room_key}", get(rest::enter_meeting_handler))
        .route("/meeting/{room_key}/name", post(rest::supply_name_handler))
        .route("/meeting/{room_key}/end", post(rest::end_call_handler));

    let feedback_routes = Router::new()
        .route(
            "/feedback/{room_key}/sessions",
            post(feedback::open_session_handler),
        )
        .route(
            "/feedback/sessions/{id}",
            get(feedback::get_session_handler).delete(feedback::abandon_handler),
        )
        .route(
            "/feedback/sessions/{id}/answers",
            post(feedback::select_answer_handler),
        )
        .route(
            "/feedback/sessions/{id}/rating",
            post(feedback::set_rating_handler),
        )
        .route(
            "/feedback/sessions/{id}/notes",
            post(feedback::set_notes_handler),
        )
        .route("/feedback/sessions/{id}/next", post(feedback::next_step_handler))
        .route(
            "/feedback/sessions/{id}/previous",
            post(feedback::previous_step_handler),
        )
        .route("/feedback/sessions/{id}/submit", post(feedback::submit_handler))
        .route("/feedback/sessions/{id}/export", get(feedback::export_handler))
        .route("/api/feedback", post(feedback::receive_feedback_handler));

    let api_router = Router::new()
        .merge(room_routes)
        .merge(feedback_routes)
        .layer(cors)
        .with_state(app_state);

    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", rest::ApiDoc::openapi())))
}
