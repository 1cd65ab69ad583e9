// ── Room detail ──
//
// Devices of one room, with config export/import. Every `open` or
// `refresh` goes back through `Loading`; there is no automatic retry.

use std::sync::Arc;

use tracing::debug;

use roomctl_api::ApiClient;
use roomctl_api::models::{ConfigExport, UpdateRoomRequest};

use super::{Snapshot, ack_message, reconcile, surface};
use crate::error::CoreError;
use crate::model::{Device, Room};
use crate::notices::Notices;

/// Load state of the room detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No room opened yet.
    Idle,
    Loading,
    /// The last load failed; holds the operator-facing message.
    Error(String),
    /// The room has no devices.
    Empty,
    Populated(Vec<Device>),
}

impl LoadState {
    pub fn devices(&self) -> &[Device] {
        match self {
            Self::Populated(devices) => devices,
            _ => &[],
        }
    }
}

/// Snapshot published by [`RoomDetailView`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDetailState {
    pub room_id: Option<i64>,
    pub state: LoadState,
}

pub struct RoomDetailView {
    client: ApiClient,
    notices: Notices,
    snapshot: Snapshot<RoomDetailState>,
}

impl RoomDetailView {
    pub(crate) fn new(client: ApiClient, notices: Notices) -> Self {
        Self {
            client,
            notices,
            snapshot: Snapshot::new(RoomDetailState {
                room_id: None,
                state: LoadState::Idle,
            }),
        }
    }

    pub fn current(&self) -> Arc<RoomDetailState> {
        self.snapshot.current()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<RoomDetailState>> {
        self.snapshot.subscribe()
    }

    pub fn room_id(&self) -> Option<i64> {
        self.snapshot.current().room_id
    }

    /// Switch to room `id` and load its devices.
    pub async fn open(&self, id: i64) -> Result<Arc<RoomDetailState>, CoreError> {
        self.snapshot.replace(RoomDetailState {
            room_id: Some(id),
            state: LoadState::Loading,
        });

        let result = self.client.list_room_devices(id).await;

        // A newer `open` for another room owns the snapshot now.
        if self.room_id() != Some(id) {
            debug!(id, "discarding devices of a room that is no longer open");
            return result
                .map(|_| self.snapshot.current())
                .map_err(CoreError::from);
        }

        match result {
            Ok(devices) => {
                let state = if devices.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Populated(devices.into_iter().map(Device::from).collect())
                };
                Ok(self.snapshot.replace(RoomDetailState {
                    room_id: Some(id),
                    state,
                }))
            }
            Err(e) => {
                let err = surface(&self.notices, "Failed to load room", e.into());
                self.snapshot.replace(RoomDetailState {
                    room_id: Some(id),
                    state: LoadState::Error(err.to_string()),
                });
                Err(err)
            }
        }
    }

    /// Reload the currently open room.
    pub async fn refresh(&self) -> Result<Arc<RoomDetailState>, CoreError> {
        let id = self.require_room()?;
        self.open(id).await
    }

    /// Room name and device list straight from the backend.
    pub async fn details(&self) -> Result<Room, CoreError> {
        let id = self.require_room()?;
        self.client
            .get_room(id)
            .await
            .map(Room::from)
            .map_err(|e| surface(&self.notices, "Failed to load room", e.into()))
    }

    /// Rename the open room, then reload.
    pub async fn rename(&self, name: &str) -> Result<Room, CoreError> {
        let id = self.require_room()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(surface(
                &self.notices,
                "Cannot rename room",
                CoreError::validation("room name", "must not be empty"),
            ));
        }

        let req = UpdateRoomRequest {
            name: Some(name.to_owned()),
            device_macs: None,
        };
        reconcile(
            &self.notices,
            "Failed to rename room",
            self.client.update_room(id, &req),
            |room| format!("Room renamed to '{}'", room.name),
            || self.refresh(),
        )
        .await
        .map(Room::from)
    }

    /// Download a config blob. Not a mutation, so nothing is reloaded.
    pub async fn export(&self, device_id: Option<i64>) -> Result<ConfigExport, CoreError> {
        match self.client.export_config(device_id).await {
            Ok(export) => {
                self.notices.success("Configuration exported");
                Ok(export)
            }
            Err(e) => Err(surface(
                &self.notices,
                "Failed to export configuration",
                e.into(),
            )),
        }
    }

    /// Upload a config blob, then reload the open room.
    pub async fn import(
        &self,
        file_name: &str,
        data: bytes::Bytes,
        device_id: Option<i64>,
    ) -> Result<(), CoreError> {
        self.require_room()?;
        reconcile(
            &self.notices,
            "Failed to import configuration",
            self.client.import_config(file_name, data, device_id),
            |ack| ack_message(ack, "Configuration imported"),
            || self.refresh(),
        )
        .await
        .map(drop)
    }

    fn require_room(&self) -> Result<i64, CoreError> {
        self.room_id()
            .ok_or_else(|| CoreError::validation("room", "no room is open"))
    }
}
