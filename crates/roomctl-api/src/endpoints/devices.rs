// Device and measurement endpoints
//
// Devices are addressed by MAC address in the path; the caller is expected
// to have validated the syntax already.

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CreateDeviceRequest, DeviceResponse, MeasurementExportResponse, MessageResponse};

impl ApiClient {
    /// List all registered devices.
    ///
    /// `GET {admin}/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceResponse>, Error> {
        let url = self.url(&self.paths().admin_path("devices"))?;
        self.get(url).await
    }

    /// Fetch one device by MAC address.
    ///
    /// `GET {admin}/devices/{mac}`
    pub async fn get_device(&self, mac: &str) -> Result<DeviceResponse, Error> {
        let url = self.url_with(&self.paths().admin_path("devices"), &[mac])?;
        self.get(url).await
    }

    /// Register a new device.
    ///
    /// `POST {admin}/devices` with `{"mac_address": "..."}`
    pub async fn add_device(&self, mac: &str) -> Result<DeviceResponse, Error> {
        let url = self.url(&self.paths().admin_path("devices"))?;
        debug!(mac, "adding device");
        self.post(
            url,
            &CreateDeviceRequest {
                mac_address: mac.to_owned(),
            },
        )
        .await
    }

    /// Remove a device.
    ///
    /// `DELETE {admin}/devices/{mac}`
    pub async fn delete_device(&self, mac: &str) -> Result<MessageResponse, Error> {
        let url = self.url_with(&self.paths().admin_path("devices"), &[mac])?;
        debug!(mac, "deleting device");
        self.acknowledge(Method::DELETE, url, &[]).await
    }

    /// Flat export of every stored measurement.
    ///
    /// `GET {admin}/measurements/export`
    pub async fn export_measurements(&self) -> Result<Vec<MeasurementExportResponse>, Error> {
        let url = self.url(&self.paths().admin_path("measurements/export"))?;
        self.get(url).await
    }
}
