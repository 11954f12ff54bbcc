//! services/api/src/adapters/video_provider.rs
//!
//! This module contains the adapter for a hosted video provider's REST API
//! (Stream-style `/video/call/{type}/{id}` resources).
//! It implements the `RoomProvider` port from the `core` crate.

use crate::config::VideoProviderConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interview_room_core::ports::{PortError, PortResult, RoomProvider, RoomQuery};
use interview_room_core::{RoomHandle, RoomKey, RoomMetadata};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `RoomProvider` port over HTTP.
#[derive(Clone)]
pub struct HttpRoomProvider {
    agent: ureq::Agent,
    config: VideoProviderConfig,
}

impl HttpRoomProvider {
    /// Creates a new `HttpRoomProvider`.
    pub fn new(config: VideoProviderConfig, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self { agent, config }
    }

    /// Appends each segment to the base URL, percent-encoded.
    fn endpoint<I>(&self, segments: I) -> PortResult<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| PortError::Unexpected(format!("invalid provider URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| PortError::Unexpected("provider URL cannot take a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn call_url(&self, key: &RoomKey, action: Option<&str>) -> PortResult<String> {
        let call = ["video", "call", self.config.call_type.as_str(), key.as_str()];
        self.endpoint(call.into_iter().chain(action))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .query("api_key", &self.config.api_key)
            .set("Authorization", &self.config.server_token)
            .set("stream-auth-type", "jwt")
            .set("Accept", "application/json")
    }
}

//=========================================================================================
// "Impure" Provider Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct CallRecord {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    custom: Map<String, Value>,
}

impl CallRecord {
    fn to_domain(self) -> PortResult<RoomHandle> {
        let key = RoomKey::parse(&self.id)
            .ok_or_else(|| PortError::Unexpected("provider returned a call without id".into()))?;
        let custom: BTreeMap<String, String> = self
            .custom
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(s) => (name, s),
                other => (name, other.to_string()),
            })
            .collect();
        Ok(RoomHandle {
            key,
            created_at: self.created_at,
            starts_at: self.starts_at,
            ended_at: self.ended_at,
            custom,
        })
    }
}

#[derive(Deserialize)]
struct CallResponse {
    call: CallRecord,
}

#[derive(Deserialize)]
struct QueryCallsResponse {
    #[serde(default)]
    calls: Vec<CallResponse>,
}

fn map_ureq_error(context: &str, err: ureq::Error) -> PortError {
    match err {
        ureq::Error::Status(404, _) => PortError::NotFound(context.to_string()),
        ureq::Error::Status(code, response) => {
            let detail = response.into_string().unwrap_or_default();
            PortError::Unexpected(format!("{context}: provider returned {code} {detail}"))
        }
        ureq::Error::Transport(transport) => {
            PortError::Unexpected(format!("{context}: {transport}"))
        }
    }
}

/// Runs a blocking `ureq` call off the async runtime.
async fn blocking<T, F>(f: F) -> PortResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> PortResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PortError::Unexpected(format!("provider task failed: {e}")))?
}

//=========================================================================================
// `RoomProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl RoomProvider for HttpRoomProvider {
    async fn get_room(&self, key: &RoomKey) -> PortResult<RoomHandle> {
        let request = self.request("GET", &self.call_url(key, None)?);
        let context = format!("get call {key}");
        blocking(move || {
            let response = request.call().map_err(|e| map_ureq_error(&context, e))?;
            let body: CallResponse = response
                .into_json()
                .map_err(|e| PortError::Unexpected(format!("{context}: {e}")))?;
            body.call.to_domain()
        })
        .await
    }

    async fn get_or_create_room(
        &self,
        key: &RoomKey,
        metadata: &RoomMetadata,
    ) -> PortResult<RoomHandle> {
        debug!("Provider get-or-create for {}", key);
        let request = self.request("POST", &self.call_url(key, None)?);
        let context = format!("get-or-create call {key}");
        let body = json!({
            "data": {
                "starts_at": metadata.starts_at.to_rfc3339(),
                "custom": metadata.custom,
            }
        });
        blocking(move || {
            let response = request
                .send_json(body)
                .map_err(|e| map_ureq_error(&context, e))?;
            let body: CallResponse = response
                .into_json()
                .map_err(|e| PortError::Unexpected(format!("{context}: {e}")))?;
            body.call.to_domain()
        })
        .await
    }

    async fn query_rooms(&self, query: &RoomQuery) -> PortResult<Vec<RoomHandle>> {
        let RoomQuery::ById(key) = query;
        let request = self.request("POST", &self.endpoint(["video", "calls"])?);
        let context = format!("query calls {key}");
        let body = json!({ "filter_conditions": { "id": key.as_str() } });
        blocking(move || {
            let response = request
                .send_json(body)
                .map_err(|e| map_ureq_error(&context, e))?;
            let body: QueryCallsResponse = response
                .into_json()
                .map_err(|e| PortError::Unexpected(format!("{context}: {e}")))?;
            body.calls.into_iter().map(|c| c.call.to_domain()).collect()
        })
        .await
    }

    async fn end_room(&self, key: &RoomKey) -> PortResult<()> {
        let request = self.request("POST", &self.call_url(key, Some("mark_ended"))?);
        let context = format!("end call {key}");
        blocking(move || {
            request
                .send_json(json!({}))
                .map(|_| ())
                .map_err(|e| map_ureq_error(&context, e))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use interview_room_core::RoomSession;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Calls = Arc<Mutex<HashMap<String, Value>>>;

    fn call_json(id: &str, custom: &Value) -> Value {
        json!({
            "call": {
                "id": id,
                "type": "default",
                "created_at": "2026-10-01T09:00:00Z",
                "custom": custom,
            }
        })
    }

    /// A minimal stand-in for the provider's call endpoints.
    async fn spawn_fake_provider() -> String {
        let calls: Calls = Arc::default();
        let get_calls = calls.clone();
        let create_calls = calls.clone();

        let app = Router::new()
            .route(
                "/video/call/default/{id}",
                get(move |Path(id): Path<String>, Query(q): Query<HashMap<String, String>>| {
                    let calls = get_calls.clone();
                    async move {
                        if q.get("api_key").map(String::as_str) != Some("key") {
                            return Err(StatusCode::UNAUTHORIZED);
                        }
                        calls
                            .lock()
                            .await
                            .get(&id)
                            .cloned()
                            .map(Json)
                            .ok_or(StatusCode::NOT_FOUND)
                    }
                })
                .post(move |Path(id): Path<String>, Json(body): Json<Value>| {
                    let calls = create_calls.clone();
                    async move {
                        let mut calls = calls.lock().await;
                        let call = calls
                            .entry(id.clone())
                            .or_insert_with(|| call_json(&id, &body["data"]["custom"]))
                            .clone();
                        (StatusCode::CREATED, Json(call))
                    }
                }),
            )
            .route(
                "/video/calls",
                post(|| async { Json(json!({ "calls": [] })) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: String) -> HttpRoomProvider {
        HttpRoomProvider::new(
            VideoProviderConfig {
                base_url,
                api_key: "key".into(),
                server_token: "token".into(),
                call_type: "default".into(),
            },
            Duration::from_secs(5),
        )
    }

    #[test]
    fn call_urls_are_built_from_encoded_segments() {
        let mut provider = provider("https://video.example.com/api".into());
        let key = RoomKey::parse("room-64f1c2-sam-lee").unwrap();
        assert_eq!(
            provider.call_url(&key, None).unwrap(),
            "https://video.example.com/api/video/call/default/room-64f1c2-sam-lee"
        );
        assert_eq!(
            provider.call_url(&key, Some("mark_ended")).unwrap(),
            "https://video.example.com/api/video/call/default/room-64f1c2-sam-lee/mark_ended"
        );

        provider.config.call_type = "team/admin".into();
        assert_eq!(
            provider.call_url(&key, None).unwrap(),
            "https://video.example.com/api/video/call/team%2Fadmin/room-64f1c2-sam-lee"
        );
    }

    #[tokio::test]
    async fn unknown_call_is_not_found() {
        let provider = provider(spawn_fake_provider().await);
        let key = RoomKey::parse("personal-nobody").unwrap();
        assert!(matches!(
            provider.get_room(&key).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn room_session_creates_then_reuses_the_call() {
        let provider = Arc::new(provider(spawn_fake_provider().await));
        let session = RoomSession::new(provider.clone());
        let key = RoomKey::parse("room-64f1c2-sam-lee").unwrap();
        let metadata = RoomMetadata::starting_now()
            .with_field("mongoId", "64f1c2")
            .with_field("created_for", "Sam Lee");

        let created = session.acquire_or_create(&key, &metadata).await.unwrap();
        assert_eq!(created.key, key);
        assert_eq!(created.custom.get("created_for").map(String::as_str), Some("Sam Lee"));

        let again = session
            .acquire_or_create(&key, &RoomMetadata::starting_now())
            .await
            .unwrap();
        assert_eq!(again, created);
    }

    #[tokio::test]
    async fn query_returns_empty_for_unknown_ids() {
        let provider = provider(spawn_fake_provider().await);
        let rooms = provider
            .query_rooms(&RoomQuery::ById(RoomKey::parse("abc").unwrap()))
            .await
            .unwrap();
        assert!(rooms.is_empty());
    }
}
