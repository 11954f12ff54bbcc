//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpFeedbackTransport, HttpRoomProvider, InMemoryRoomProvider},
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use interview_room_core::ports::{FeedbackTransport, RoomProvider};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let provider: Arc<dyn RoomProvider> = match &config.video_provider {
        Some(video) => {
            info!("Using video provider at {}", video.base_url);
            Arc::new(HttpRoomProvider::new(video.clone(), config.provider_timeout))
        }
        None => {
            warn!("VIDEO_PROVIDER_URL is not set; rooms are kept in memory.");
            Arc::new(InMemoryRoomProvider::new())
        }
    };

    let transport: Arc<dyn FeedbackTransport> =
        Arc::new(HttpFeedbackTransport::new(config.feedback_timeout));
    match &config.feedback_api_base_url {
        Some(base) => info!("Feedback will be posted to {}", base),
        None => info!(
            "Feedback will be posted to the local receiver at {}",
            config.fallback_feedback_url()
        ),
    }

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), provider, transport));
    let _sweeper = app_state.spawn_idle_sweeper(config.feedback_session_ttl);
    info!(
        "Idle feedback forms are closed after {}s",
        config.feedback_session_ttl.as_secs()
    );

    // --- 4. Create the Web Router ---
    let app = build_router(app_state)?;

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
