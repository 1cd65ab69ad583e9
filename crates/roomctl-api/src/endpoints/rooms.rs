// Room endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CreateRoomRequest, DeviceResponse, MessageResponse, RoomResponse, UpdateRoomRequest};

impl ApiClient {
    /// List all rooms with their devices.
    ///
    /// `GET {admin}/rooms`
    pub async fn list_rooms(&self) -> Result<Vec<RoomResponse>, Error> {
        let url = self.url(&self.paths().admin_path("rooms"))?;
        self.get(url).await
    }

    /// Fetch one room.
    ///
    /// `GET {admin}/rooms/{id}`
    pub async fn get_room(&self, id: i64) -> Result<RoomResponse, Error> {
        let url = self.url(&self.paths().admin_path(&format!("rooms/{id}")))?;
        self.get(url).await
    }

    /// Devices currently assigned to a room, with measurements and configs.
    ///
    /// `GET {admin}/rooms/{id}/devices`
    pub async fn list_room_devices(&self, id: i64) -> Result<Vec<DeviceResponse>, Error> {
        let url = self.url(&self.paths().admin_path(&format!("rooms/{id}/devices")))?;
        self.get(url).await
    }

    /// Create a room and attach the given devices to it.
    ///
    /// `POST {admin}/rooms` with `{"name": "...", "device_macs": [...]}`
    pub async fn create_room(&self, req: &CreateRoomRequest) -> Result<RoomResponse, Error> {
        let url = self.url(&self.paths().admin_path("rooms"))?;
        debug!(name = %req.name, devices = req.device_macs.len(), "creating room");
        self.post(url, req).await
    }

    /// Rename a room or replace its device list.
    ///
    /// `PUT {admin}/rooms/{id}`
    pub async fn update_room(&self, id: i64, req: &UpdateRoomRequest) -> Result<RoomResponse, Error> {
        let url = self.url(&self.paths().admin_path(&format!("rooms/{id}")))?;
        debug!(id, "updating room");
        self.put(url, req).await
    }

    /// Delete a room.
    ///
    /// `DELETE {admin}/rooms/{id}`
    pub async fn delete_room(&self, id: i64) -> Result<MessageResponse, Error> {
        let url = self.url(&self.paths().admin_path(&format!("rooms/{id}")))?;
        debug!(id, "deleting room");
        self.acknowledge(Method::DELETE, url, &[]).await
    }
}
