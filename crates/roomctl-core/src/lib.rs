//! Session handling and view-state reconciliation for the roomctl console.
//!
//! - **[`Console`]**: owns the [`SessionStore`] and the gateway client for one
//!   backend. The session is injected into the client as its credential
//!   provider, so a 401 from any request clears it.
//!
//! - **[`SessionStore`]**: bearer token plus server-confirmed [`Identity`].
//!   The token outlives the process through a [`TokenStore`]; the identity
//!   never does.
//!
//! - **Views** ([`views`]): one controller per screen. `load()` replaces the
//!   snapshot with the server response; every mutation is followed by a
//!   reload, and a failed mutation leaves the snapshot untouched.
//!
//! - **[`Notices`]**: shared success/error messages for the operator.

pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod model;
pub mod notices;
pub mod session;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::CoreError;
pub use notices::{Notice, NoticeLevel, Notices};
pub use session::{MemoryTokenStore, SessionStore, TokenStore};
pub use views::{
    DevicesView, LoadState, RoomDetailState, RoomDetailView, RoomsView, Snapshot, StatisticsView,
    UserActions, UsersView,
};

pub use model::{
    Aggregate, Device, DeviceConfig, Identity, MacAddress, Measurement, MeasurementExport, Role,
    Room, StatisticsReport, TimeRange, User,
};

pub use roomctl_api::models::ConfigExport;
pub use roomctl_api::{ApiPaths, TlsMode};
