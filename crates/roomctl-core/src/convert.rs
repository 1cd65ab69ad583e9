// ── Wire → domain conversions ──

use roomctl_api::models::{
    DeviceConfigResponse, DeviceResponse, MeResponse, MeasurementExportResponse,
    MeasurementResponse, RoomResponse, StatisticsReportResponse, UserResponse,
};

use crate::model::{
    Aggregate, Device, DeviceConfig, Identity, Measurement, MeasurementExport, Role, Room,
    StatisticsReport, User,
};

impl From<RoomResponse> for Room {
    fn from(r: RoomResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            devices: r.devices.into_iter().map(Device::from).collect(),
        }
    }
}

impl From<DeviceResponse> for Device {
    fn from(d: DeviceResponse) -> Self {
        Self {
            id: d.id,
            mac_address: d.mac_address,
            room_id: d.room_id,
            measurements: d.measurements.into_iter().map(Measurement::from).collect(),
            configs: d.configs.into_iter().map(DeviceConfig::from).collect(),
        }
    }
}

impl From<MeasurementResponse> for Measurement {
    fn from(m: MeasurementResponse) -> Self {
        Self {
            id: m.id,
            timestamp: m.timestamp,
            temperature: m.temperature,
            humidity: m.humidity,
            co2: m.co2,
        }
    }
}

impl From<DeviceConfigResponse> for DeviceConfig {
    fn from(c: DeviceConfigResponse) -> Self {
        Self {
            id: c.id,
            data: c.config_data,
        }
    }
}

impl From<MeasurementExportResponse> for MeasurementExport {
    fn from(m: MeasurementExportResponse) -> Self {
        Self {
            id: m.id,
            device_id: m.device_id,
            timestamp: m.timestamp,
            temperature: m.temperature,
            humidity: m.humidity,
            co2: m.co2,
        }
    }
}

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id,
            role: Role::from_backend(&u.role),
            username: u.username,
            is_banned: u.is_banned,
        }
    }
}

impl From<MeResponse> for Identity {
    fn from(me: MeResponse) -> Self {
        Self {
            role: Role::from_backend(&me.role),
            username: me.username,
        }
    }
}

impl From<StatisticsReportResponse> for StatisticsReport {
    fn from(s: StatisticsReportResponse) -> Self {
        Self {
            device_id: s.device_id,
            room_id: s.room_id,
            co2: Aggregate {
                avg: s.avg_co2,
                median: s.median_co2,
                deviation: s.co2_deviation,
            },
            temperature: Aggregate {
                avg: s.avg_temperature,
                median: s.median_temperature,
                deviation: s.temperature_deviation,
            },
            humidity: Aggregate {
                avg: s.avg_humidity,
                median: s.median_humidity,
                deviation: s.humidity_deviation,
            },
            productivity: Aggregate {
                avg: s.avg_productivity,
                median: s.median_productivity,
                deviation: s.productivity_deviation,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn room_with_nested_devices() {
        let wire: RoomResponse = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Lab1",
            "devices": [{
                "id": 1,
                "mac_address": "AA:BB:CC:DD:EE:FF",
                "room_id": 7,
                "measurements": [
                    { "id": 1, "timestamp": "2024-05-01T10:00:00", "temperature": 20.0, "humidity": 40.0, "co2": 500.0 },
                    { "id": 2, "timestamp": "2024-05-01T11:00:00", "temperature": 21.0, "humidity": 41.0, "co2": 510.0 }
                ],
                "configs": [{ "id": 3, "config_data": { "interval": 30 } }]
            }]
        }))
        .unwrap();

        let room = Room::from(wire);
        assert_eq!(room.devices.len(), 1);
        let device = &room.devices[0];
        assert_eq!(device.latest_measurement().map(|m| m.id), Some(2));
        assert_eq!(device.configs[0].data["interval"], 30);
    }

    #[test]
    fn statistics_grouped_by_metric() {
        let wire: StatisticsReportResponse = serde_json::from_value(serde_json::json!({
            "device_id": 2,
            "avg_co2": 600.0,
            "median_humidity": 45.0
        }))
        .unwrap();

        let report = StatisticsReport::from(wire);
        assert_eq!(report.co2.avg, Some(600.0));
        assert_eq!(report.humidity.median, Some(45.0));
        assert!(report.productivity.is_empty());
    }
}
