//! crates/interview_room_core/src/room_session.rs
//!
//! Idempotent room acquisition on top of the `RoomProvider` port.

use crate::domain::{RoomHandle, RoomKey, RoomMetadata};
use crate::error::{CoreError, CoreResult};
use crate::ports::{PortError, RoomProvider, RoomQuery};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct RoomSession {
    provider: Arc<dyn RoomProvider>,
}

impl RoomSession {
    pub fn new(provider: Arc<dyn RoomProvider>) -> Self {
        Self { provider }
    }

    /// Returns the room for `key`, creating it with `metadata` only if it does not exist yet.
    ///
    /// Order of attempts: fetch, create, one re-fetch (a concurrent joiner may have won the
    /// create), then a query by id. Only when all of them fail is `RoomUnavailable` returned.
    pub async fn acquire_or_create(
        &self,
        key: &RoomKey,
        metadata: &RoomMetadata,
    ) -> CoreResult<RoomHandle> {
        match self.provider.get_room(key).await {
            Ok(handle) => {
                debug!("Reusing existing room {}", key);
                return Ok(handle);
            }
            Err(PortError::NotFound(_)) => debug!("Room {} not found, creating it", key),
            Err(e) => warn!("Fetching room {} failed: {}", key, e),
        }

        let create_error = match self.provider.get_or_create_room(key, metadata).await {
            Ok(handle) => {
                info!("Room {} ready", key);
                return Ok(handle);
            }
            Err(e) => e,
        };
        warn!("Creating room {} failed: {}", key, create_error);

        if let Ok(handle) = self.provider.get_room(key).await {
            info!("Room {} was created concurrently, reusing it", key);
            return Ok(handle);
        }

        match self.provider.query_rooms(&RoomQuery::ById(key.clone())).await {
            Ok(rooms) => rooms.into_iter().next().ok_or_else(|| CoreError::RoomUnavailable {
                key: key.clone(),
                reason: create_error.to_string(),
            }),
            Err(query_error) => Err(CoreError::RoomUnavailable {
                key: key.clone(),
                reason: format!("{create_error}; query fallback: {query_error}"),
            }),
        }
    }

    /// Ends the room at the provider for everyone in it.
    pub async fn end_for_everyone(&self, key: &RoomKey) -> CoreResult<()> {
        self.provider
            .end_room(key)
            .await
            .map_err(|e| CoreError::RoomUnavailable {
                key: key.clone(),
                reason: e.to_string(),
            })
    }
}
