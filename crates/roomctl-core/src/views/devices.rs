// ── Devices list ──

use std::sync::Arc;

use tracing::debug;

use roomctl_api::ApiClient;

use super::{Snapshot, ack_message, reconcile, surface};
use crate::error::CoreError;
use crate::model::{Device, MacAddress};
use crate::notices::Notices;

pub struct DevicesView {
    client: ApiClient,
    notices: Notices,
    snapshot: Snapshot<Vec<Device>>,
}

impl DevicesView {
    pub(crate) fn new(client: ApiClient, notices: Notices) -> Self {
        Self {
            client,
            notices,
            snapshot: Snapshot::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Arc<Vec<Device>> {
        self.snapshot.current()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<Vec<Device>>> {
        self.snapshot.subscribe()
    }

    pub async fn load(&self) -> Result<Arc<Vec<Device>>, CoreError> {
        match self.client.list_devices().await {
            Ok(devices) => {
                debug!(count = devices.len(), "devices loaded");
                Ok(self
                    .snapshot
                    .replace(devices.into_iter().map(Device::from).collect()))
            }
            Err(e) => Err(surface(&self.notices, "Failed to load devices", e.into())),
        }
    }

    /// Look up one device on the backend without touching the snapshot.
    pub async fn get(&self, mac: &str) -> Result<Device, CoreError> {
        let mac = self.validate(mac, "Cannot look up device")?;
        self.client
            .get_device(mac.as_str())
            .await
            .map(Device::from)
            .map_err(|e| surface(&self.notices, "Failed to load device", e.into()))
    }

    /// Register a device, then reload.
    pub async fn add(&self, mac: &str) -> Result<Device, CoreError> {
        let mac = self.validate(mac, "Cannot add device")?;
        reconcile(
            &self.notices,
            "Failed to add device",
            self.client.add_device(mac.as_str()),
            |device| format!("Device {} added", device.mac_address),
            || self.load(),
        )
        .await
        .map(Device::from)
    }

    /// Remove a device, then reload.
    pub async fn remove(&self, mac: &str) -> Result<(), CoreError> {
        let mac = self.validate(mac, "Cannot remove device")?;
        reconcile(
            &self.notices,
            "Failed to remove device",
            self.client.delete_device(mac.as_str()),
            |ack| ack_message(ack, "Device removed"),
            || self.load(),
        )
        .await
        .map(drop)
    }

    fn validate(&self, mac: &str, context: &str) -> Result<MacAddress, CoreError> {
        MacAddress::parse(mac).map_err(|e| surface(&self.notices, context, e))
    }
}
