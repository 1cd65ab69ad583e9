// ── Domain model ──
//
// Canonical types the views publish. Wire types from `roomctl-api` are
// converted in `crate::convert`.

pub mod mac;
pub mod room;
pub mod statistics;
pub mod user;

pub use mac::MacAddress;
pub use room::{Device, DeviceConfig, Measurement, MeasurementExport, Room};
pub use statistics::{Aggregate, StatisticsReport, TimeRange};
pub use user::{Identity, Role, User};
