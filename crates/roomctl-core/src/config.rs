// ── Runtime connection configuration ──
//
// Describes how to reach the backend. Built by the CLI from a profile
// and handed to `Console`; core never reads config files.

use std::time::Duration;

use url::Url;

use roomctl_api::{ApiPaths, TlsMode, TransportConfig};

/// Everything `Console` needs to talk to one backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL (e.g. `https://rooms.example.com`).
    pub base_url: Url,
    /// Route prefixes.
    pub paths: ApiPaths,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            paths: ApiPaths::default(),
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
