// ── Rooms list ──

use std::sync::Arc;

use tracing::debug;

use roomctl_api::ApiClient;
use roomctl_api::models::CreateRoomRequest;

use super::{Snapshot, ack_message, reconcile, surface};
use crate::error::CoreError;
use crate::model::{MacAddress, Room};
use crate::notices::Notices;

/// All rooms with their devices.
pub struct RoomsView {
    client: ApiClient,
    notices: Notices,
    snapshot: Snapshot<Vec<Room>>,
}

impl RoomsView {
    pub(crate) fn new(client: ApiClient, notices: Notices) -> Self {
        Self {
            client,
            notices,
            snapshot: Snapshot::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Arc<Vec<Room>> {
        self.snapshot.current()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<Vec<Room>>> {
        self.snapshot.subscribe()
    }

    /// Replace the snapshot with the server's room list.
    pub async fn load(&self) -> Result<Arc<Vec<Room>>, CoreError> {
        match self.client.list_rooms().await {
            Ok(rooms) => {
                debug!(count = rooms.len(), "rooms loaded");
                Ok(self
                    .snapshot
                    .replace(rooms.into_iter().map(Room::from).collect()))
            }
            Err(e) => Err(surface(&self.notices, "Failed to load rooms", e.into())),
        }
    }

    /// Create a room with the given devices, then reload.
    ///
    /// The name must be non-empty after trimming and every MAC must be
    /// well-formed; nothing is sent otherwise.
    pub async fn create(&self, name: &str, macs: &[String]) -> Result<Room, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(surface(
                &self.notices,
                "Cannot create room",
                CoreError::validation("room name", "must not be empty"),
            ));
        }
        let device_macs = macs
            .iter()
            .map(|m| MacAddress::parse(m.as_str()).map(String::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| surface(&self.notices, "Cannot create room", e))?;

        let req = CreateRoomRequest {
            name: name.to_owned(),
            device_macs,
        };
        let created = reconcile(
            &self.notices,
            "Failed to create room",
            self.client.create_room(&req),
            |room| format!("Room '{}' created", room.name),
            || self.load(),
        )
        .await?;
        Ok(Room::from(created))
    }

    /// Delete a room, then reload.
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        reconcile(
            &self.notices,
            "Failed to delete room",
            self.client.delete_room(id),
            |ack| ack_message(ack, "Room deleted"),
            || self.load(),
        )
        .await
        .map(drop)
    }
}
