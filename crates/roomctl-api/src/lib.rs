// roomctl-api: Async Rust client for the room/device/sensor management backend

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Anonymous, ApiPaths, CredentialProvider};
pub use client::ApiClient;
pub use endpoints::{StatisticsQuery, export_file_name};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
