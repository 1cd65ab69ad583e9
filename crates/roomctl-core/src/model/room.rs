// ── Room and device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A room with the devices assigned to it, in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub devices: Vec<Device>,
}

/// A sensor device identified by MAC address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub mac_address: String,
    pub room_id: Option<i64>,
    pub measurements: Vec<Measurement>,
    pub configs: Vec<DeviceConfig>,
}

impl Device {
    /// Most recent measurement, if any.
    pub fn latest_measurement(&self) -> Option<&Measurement> {
        self.measurements.iter().max_by_key(|m| m.timestamp)
    }
}

/// One sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
}

/// A stored device configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub id: i64,
    pub data: serde_json::Value,
}

/// One row of the flat measurement export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementExport {
    pub id: i64,
    pub device_id: i64,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
}
