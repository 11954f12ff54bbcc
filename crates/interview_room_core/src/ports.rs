//! crates/interview_room_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the concrete video provider and HTTP client.

use crate::domain::{RoomHandle, RoomKey, RoomMetadata};
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, provider SDK).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Filter accepted by `RoomProvider::query_rooms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomQuery {
    ById(RoomKey),
}

/// The real-time communication provider's room API. Media semantics are not modelled.
#[async_trait]
pub trait RoomProvider: Send + Sync {
    /// Fetches an existing room. Returns `PortError::NotFound` when the key is unknown.
    async fn get_room(&self, key: &RoomKey) -> PortResult<RoomHandle>;

    /// Returns the existing room for `key`, or creates it with `metadata`.
    async fn get_or_create_room(
        &self,
        key: &RoomKey,
        metadata: &RoomMetadata,
    ) -> PortResult<RoomHandle>;

    async fn query_rooms(&self, query: &RoomQuery) -> PortResult<Vec<RoomHandle>>;

    /// Ends the room for every participant.
    async fn end_room(&self, key: &RoomKey) -> PortResult<()>;
}

/// A response that made it back from the feedback endpoint, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub body: Option<Value>,
}

/// Failures where no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    /// The request was sent but nothing came back (timeout, refused, DNS).
    #[error("no response received: {0}")]
    NoResponse(String),
    /// The request could not be built or sent at all.
    #[error("request failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait FeedbackTransport: Send + Sync {
    /// POSTs a JSON body with `Content-Type: application/json`, exactly once.
    async fn post_json(&self, endpoint: &str, body: &Value)
        -> Result<TransportReply, TransportFailure>;
}
