//! services/api/src/adapters/memory_rooms.rs
//!
//! A process-local `RoomProvider`. Used when no hosted video provider is configured and
//! by the tests. Get-or-create runs under one lock, so it is atomic.

use async_trait::async_trait;
use chrono::Utc;
use interview_room_core::ports::{PortError, PortResult, RoomProvider, RoomQuery};
use interview_room_core::{RoomHandle, RoomKey, RoomMetadata};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryRoomProvider {
    rooms: Mutex<HashMap<RoomKey, RoomHandle>>,
}

impl InMemoryRoomProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[async_trait]
impl RoomProvider for InMemoryRoomProvider {
    async fn get_room(&self, key: &RoomKey) -> PortResult<RoomHandle> {
        self.rooms
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("room {key}")))
    }

    async fn get_or_create_room(
        &self,
        key: &RoomKey,
        metadata: &RoomMetadata,
    ) -> PortResult<RoomHandle> {
        let mut rooms = self.rooms.lock().await;
        let handle = rooms.entry(key.clone()).or_insert_with(|| {
            debug!("Creating in-memory room {}", key);
            RoomHandle {
                key: key.clone(),
                created_at: Utc::now(),
                starts_at: Some(metadata.starts_at),
                ended_at: None,
                custom: metadata.custom.clone(),
            }
        });
        Ok(handle.clone())
    }

    async fn query_rooms(&self, query: &RoomQuery) -> PortResult<Vec<RoomHandle>> {
        let RoomQuery::ById(key) = query;
        Ok(self.rooms.lock().await.get(key).cloned().into_iter().collect())
    }

    async fn end_room(&self, key: &RoomKey) -> PortResult<()> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(key)
            .ok_or_else(|| PortError::NotFound(format!("room {key}")))?;
        room.ended_at.get_or_insert_with(Utc::now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn concurrent_get_or_create_yields_one_room() {
        let provider = Arc::new(InMemoryRoomProvider::new());
        let key = RoomKey::parse("personal-jane").unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let provider = provider.clone();
                let key = key.clone();
                tokio::spawn(async move {
                    let metadata =
                        RoomMetadata::starting_now().with_field("created_for", format!("tab-{i}"));
                    provider.get_or_create_room(&key, &metadata).await
                })
            })
            .collect();

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap().unwrap());
        }
        assert_eq!(provider.room_count().await, 1);
        assert!(handles.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn ending_marks_the_room_once() {
        let provider = InMemoryRoomProvider::new();
        let key = RoomKey::parse("abc").unwrap();
        assert!(matches!(provider.end_room(&key).await, Err(PortError::NotFound(_))));

        provider
            .get_or_create_room(&key, &RoomMetadata::starting_now())
            .await
            .unwrap();
        provider.end_room(&key).await.unwrap();
        let first_end = provider.get_room(&key).await.unwrap().ended_at;
        provider.end_room(&key).await.unwrap();
        assert!(first_end.is_some());
        assert_eq!(provider.get_room(&key).await.unwrap().ended_at, first_end);
    }
}
