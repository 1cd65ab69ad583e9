// Wire types for the backend API.
//
// Field names follow the backend's JSON exactly. Optional collections
// default to empty so partial payloads (e.g. a room list without nested
// devices) still decode.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Auth ─────────────────────────────────────────────────────────────

/// Response of the password-grant login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Response of the identity ("who am I") endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub role: String,
}

// ── Rooms / devices ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub devices: Vec<DeviceResponse>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceResponse {
    pub id: i64,
    pub mac_address: String,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub measurements: Vec<MeasurementResponse>,
    #[serde(default)]
    pub configs: Vec<DeviceConfigResponse>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MeasurementResponse {
    pub id: i64,
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceConfigResponse {
    pub id: i64,
    #[serde(default)]
    pub config_data: serde_json::Value,
}

/// One row of the flat measurement export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MeasurementExportResponse {
    pub id: i64,
    pub device_id: i64,
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub device_macs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRoomRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_macs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDeviceRequest {
    pub mac_address: String,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub is_banned: bool,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Aggregates for one device over the requested interval.
///
/// Every metric is optional: the backend omits aggregates for devices
/// without measurements in range.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatisticsReportResponse {
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub avg_co2: Option<f64>,
    #[serde(default)]
    pub median_co2: Option<f64>,
    #[serde(default)]
    pub co2_deviation: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default)]
    pub median_temperature: Option<f64>,
    #[serde(default)]
    pub temperature_deviation: Option<f64>,
    #[serde(default)]
    pub avg_humidity: Option<f64>,
    #[serde(default)]
    pub median_humidity: Option<f64>,
    #[serde(default)]
    pub humidity_deviation: Option<f64>,
    #[serde(default)]
    pub avg_productivity: Option<f64>,
    #[serde(default)]
    pub median_productivity: Option<f64>,
    #[serde(default)]
    pub productivity_deviation: Option<f64>,
}

// ── Generic acknowledgements ─────────────────────────────────────────

/// `{"message": "..."}` acknowledgement returned by mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// A downloaded configuration blob.
#[derive(Debug, Clone)]
pub struct ConfigExport {
    /// Filename from `Content-Disposition`, or a synthesized one.
    pub filename: String,
    /// Raw payload, never interpreted.
    pub data: bytes::Bytes,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept RFC 3339 timestamps as well as the naive ISO form
/// (`2024-05-01T12:00:00`) the backend emits; naive values are taken as UTC.
fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
