//! services/api/src/adapters/feedback_http.rs
//!
//! This module contains the HTTP adapter used to deliver feedback payloads.
//! It implements the `FeedbackTransport` port from the `core` crate.

use async_trait::async_trait;
use interview_room_core::ports::{FeedbackTransport, TransportFailure, TransportReply};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Posts JSON with a hard upper bound on the whole exchange.
#[derive(Clone)]
pub struct HttpFeedbackTransport {
    agent: ureq::Agent,
}

impl HttpFeedbackTransport {
    /// Creates a new `HttpFeedbackTransport` whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

fn parse_body(response: ureq::Response) -> Option<Value> {
    response
        .into_string()
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
}

fn classify_transport(transport: ureq::Transport) -> TransportFailure {
    match transport.kind() {
        ureq::ErrorKind::InvalidUrl
        | ureq::ErrorKind::UnknownScheme
        | ureq::ErrorKind::InvalidProxyUrl => TransportFailure::Other(transport.to_string()),
        _ => TransportFailure::NoResponse(transport.to_string()),
    }
}

#[async_trait]
impl FeedbackTransport for HttpFeedbackTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<TransportReply, TransportFailure> {
        let request = self
            .agent
            .post(endpoint)
            .set("Content-Type", "application/json");
        let body = body.clone();

        let result = tokio::task::spawn_blocking(move || match request.send_json(body) {
            Ok(response) => {
                let status = response.status();
                Ok(TransportReply {
                    status,
                    body: parse_body(response),
                })
            }
            // Non-2xx statuses still carry a response worth classifying.
            Err(ureq::Error::Status(status, response)) => Ok(TransportReply {
                status,
                body: parse_body(response),
            }),
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(transport)),
        })
        .await
        .map_err(|e| TransportFailure::Other(format!("feedback task failed: {e}")))?;

        if let Err(failure) = &result {
            warn!("Feedback POST to {} got no response: {}", endpoint, failure);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    async fn spawn_endpoint() -> String {
        let app = Router::new()
            .route(
                "/candidate/feedback",
                post(|Json(body): Json<Value>| async move {
                    (StatusCode::CREATED, Json(json!({ "received": body["candidateId"] })))
                }),
            )
            .route(
                "/interviewer/feedback",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "message": "db error" })),
                    )
                }),
            )
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    StatusCode::OK
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn success_reply_carries_status_and_body() {
        let base = spawn_endpoint().await;
        let reply = HttpFeedbackTransport::new(Duration::from_secs(5))
            .post_json(&format!("{base}/candidate/feedback"), &json!({"candidateId": "c-1"}))
            .await
            .unwrap();
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body, Some(json!({"received": "c-1"})));
    }

    #[tokio::test]
    async fn error_status_is_a_reply_not_a_failure() {
        let base = spawn_endpoint().await;
        let reply = HttpFeedbackTransport::new(Duration::from_secs(5))
            .post_json(&format!("{base}/interviewer/feedback"), &json!({}))
            .await
            .unwrap();
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body.unwrap()["message"], "db error");
    }

    #[tokio::test]
    async fn timeout_is_no_response() {
        let base = spawn_endpoint().await;
        let failure = HttpFeedbackTransport::new(Duration::from_millis(300))
            .post_json(&format!("{base}/slow"), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(failure, TransportFailure::NoResponse(_)));
    }

    #[tokio::test]
    async fn malformed_endpoint_is_another_failure() {
        let failure = HttpFeedbackTransport::new(Duration::from_secs(1))
            .post_json("not a url", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(failure, TransportFailure::Other(_)));
    }
}
