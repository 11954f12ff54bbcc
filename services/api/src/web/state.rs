//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-wizard session state.

use crate::config::Config;
use interview_room_core::ports::{FeedbackTransport, RoomProvider};
use interview_room_core::{
    FeedbackEndpoints, FeedbackSubmitter, FeedbackWizard, ParticipantContext,
    ParticipantIdentity, QuestionSet, RoomKey, RoomSession, SessionBootstrap,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub rooms: RoomSession,
    pub bootstrap: SessionBootstrap,
    pub submitter: FeedbackSubmitter,
    feedback_sessions: Mutex<HashMap<Uuid, FeedbackEntry>>,
}

/// A registered feedback form and when a request last touched it.
struct FeedbackEntry {
    session: Arc<Mutex<FeedbackSession>>,
    cancellation_token: CancellationToken,
    last_seen: Instant,
}

impl AppState {
    /// Wires the core services to the given adapters. The participant-name context starts
    /// at its default here and lives as long as the process.
    pub fn new(
        config: Arc<Config>,
        provider: Arc<dyn RoomProvider>,
        transport: Arc<dyn FeedbackTransport>,
    ) -> Self {
        let rooms = RoomSession::new(provider);
        let bootstrap = SessionBootstrap::new(rooms.clone(), ParticipantContext::default());
        let endpoints = FeedbackEndpoints::new(
            config.feedback_api_base_url.clone(),
            config.fallback_feedback_url(),
        );
        Self {
            config,
            rooms,
            bootstrap,
            submitter: FeedbackSubmitter::new(transport, endpoints),
            feedback_sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn open_feedback_session(
        &self,
        session: FeedbackSession,
    ) -> (Uuid, Arc<Mutex<FeedbackSession>>) {
        let id = Uuid::new_v4();
        let entry = FeedbackEntry {
            cancellation_token: session.cancellation_token.clone(),
            session: Arc::new(Mutex::new(session)),
            last_seen: Instant::now(),
        };
        let session = entry.session.clone();
        self.feedback_sessions.lock().await.insert(id, entry);
        (id, session)
    }

    /// Looks up a form and marks it as recently used.
    pub async fn feedback_session(&self, id: Uuid) -> Option<Arc<Mutex<FeedbackSession>>> {
        let mut sessions = self.feedback_sessions.lock().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn feedback_session_count(&self) -> usize {
        self.feedback_sessions.lock().await.len()
    }

    /// Drops the session and cancels its token so an outstanding submission result is
    /// discarded instead of applied.
    pub async fn close_feedback_session(&self, id: Uuid) -> bool {
        let removed = self.feedback_sessions.lock().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.cancellation_token.cancel();
                true
            }
            None => false,
        }
    }

    /// Closes a submitted form once the client has had time to follow its redirect.
    pub fn evict_after(self: &Arc<Self>, id: Uuid, delay: Duration) {
        let app_state = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if app_state.close_feedback_session(id).await {
                debug!("Evicted submitted feedback form {}", id);
            }
        });
    }

    /// Closes every form no request has touched for `ttl`. Returns how many were closed.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.feedback_sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let idle = entry.last_seen.elapsed() >= ttl;
            if idle {
                entry.cancellation_token.cancel();
            }
            !idle
        });
        before - sessions.len()
    }

    /// Runs `sweep_idle` periodically for the life of the process.
    pub fn spawn_idle_sweeper(self: &Arc<Self>, ttl: Duration) -> JoinHandle<()> {
        let app_state = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ttl.min(Duration::from_secs(60)));
            loop {
                ticker.tick().await;
                let closed = app_state.sweep_idle(ttl).await;
                if closed > 0 {
                    info!("Closed {} idle feedback forms", closed);
                }
            }
        })
    }
}

//=========================================================================================
// FeedbackSession (Specific to One Feedback Form)
//=========================================================================================

/// The state for a single feedback form, from opening it until it is submitted or abandoned.
pub struct FeedbackSession {
    /// `None` when the link carried no usable room key; submission then fails locally.
    pub room_key: Option<RoomKey>,
    pub identity: ParticipantIdentity,
    pub wizard: FeedbackWizard,
    /// Cancelled when the participant abandons the form.
    pub cancellation_token: CancellationToken,
}

impl FeedbackSession {
    /// The question set is picked once, from the role present when the form is opened.
    pub fn new(room_key: Option<RoomKey>, identity: ParticipantIdentity) -> Self {
        let wizard = FeedbackWizard::new(QuestionSet::for_role(identity.role));
        Self {
            room_key,
            identity,
            wizard,
            cancellation_token: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{HttpFeedbackTransport, InMemoryRoomProvider};

    fn app_state() -> Arc<AppState> {
        let config = Config::from_lookup(|_| None).unwrap();
        Arc::new(AppState::new(
            Arc::new(config),
            Arc::new(InMemoryRoomProvider::new()),
            Arc::new(HttpFeedbackTransport::new(Duration::from_secs(1))),
        ))
    }

    fn form() -> FeedbackSession {
        FeedbackSession::new(
            RoomKey::parse("room-r1-ana"),
            ParticipantIdentity::from_params(Some("candidate"), Some("Ana"), None, None),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn idle_forms_are_swept_and_cancelled() {
        let state = app_state();
        let (idle, idle_session) = state.open_feedback_session(form()).await;
        let (active, _) = state.open_feedback_session(form()).await;
        let token = idle_session.lock().await.cancellation_token.clone();

        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(state.feedback_session(active).await.is_some());
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(state.sweep_idle(Duration::from_secs(60)).await, 1);
        assert!(token.is_cancelled());
        assert!(state.feedback_session(idle).await.is_none());
        assert!(state.feedback_session(active).await.is_some());
        assert_eq!(state.feedback_session_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_forms_are_evicted_after_the_delay() {
        let state = app_state();
        let (id, _) = state.open_feedback_session(form()).await;

        state.evict_after(id, Duration::from_secs(3));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(state.feedback_session(id).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(state.feedback_session(id).await.is_none());
        assert_eq!(state.feedback_session_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_runs_on_its_own() {
        let state = app_state();
        let (id, _) = state.open_feedback_session(form()).await;
        let sweeper = state.spawn_idle_sweeper(Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(state.feedback_session_count().await, 0);
        assert!(state.feedback_session(id).await.is_none());
        sweeper.abort();
    }
}
