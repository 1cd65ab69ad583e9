// Endpoint groups of the backend API, one module per resource.
//
// Each module adds inherent methods to `ApiClient`; the transport
// mechanics (bearer token, 401 hook, error bodies) live in `crate::client`.

mod auth;
mod config;
mod devices;
mod rooms;
mod statistics;
mod users;

pub use config::export_file_name;
pub use statistics::StatisticsQuery;
