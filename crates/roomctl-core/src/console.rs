// ── Console ──
//
// Owns the session and the gateway client for one backend, and vends the
// view controllers. All views share one notice list.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info};

use roomctl_api::{ApiClient, CredentialProvider};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{Identity, MeasurementExport};
use crate::notices::Notices;
use crate::session::{SessionStore, TokenStore};
use crate::views::{DevicesView, RoomDetailView, RoomsView, StatisticsView, UsersView, surface};

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. The session is injected into
/// the gateway client as its credential provider, so a 401 on any request
/// clears it.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    session: Arc<SessionStore>,
    client: ApiClient,
    notices: Notices,
}

impl Console {
    /// Build the session and gateway client. Does not touch the network.
    pub fn new(config: ConsoleConfig, token_store: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let session = Arc::new(SessionStore::new(token_store));
        let credentials: Arc<dyn CredentialProvider> = session.clone();
        let client = ApiClient::new(
            config.base_url.clone(),
            config.paths.clone(),
            &config.transport(),
            credentials,
        )?;
        debug!(url = %config.base_url, "console initialised");

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                session,
                client,
                notices: Notices::new(),
            }),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn notices(&self) -> &Notices {
        &self.inner.notices
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Resume a persisted session. `false` leaves the console logged out.
    pub async fn restore(&self) -> bool {
        self.inner.session.restore(&self.inner.client).await
    }

    pub async fn login(&self, username: &str, password: &SecretString) -> bool {
        self.inner
            .session
            .login(&self.inner.client, username, password)
            .await
    }

    pub fn logout(&self) {
        self.inner.session.logout();
        info!("logged out");
    }

    /// Confirmed identity, or `Unauthenticated` when there is none.
    pub fn require_identity(&self) -> Result<Arc<Identity>, CoreError> {
        self.inner
            .session
            .identity()
            .ok_or(CoreError::Unauthenticated)
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn rooms(&self) -> RoomsView {
        RoomsView::new(self.inner.client.clone(), self.inner.notices.clone())
    }

    pub fn room_detail(&self) -> RoomDetailView {
        RoomDetailView::new(self.inner.client.clone(), self.inner.notices.clone())
    }

    pub fn devices(&self) -> DevicesView {
        DevicesView::new(self.inner.client.clone(), self.inner.notices.clone())
    }

    pub fn users(&self) -> UsersView {
        UsersView::new(
            self.inner.client.clone(),
            Arc::clone(&self.inner.session),
            self.inner.notices.clone(),
        )
    }

    pub fn statistics(&self) -> StatisticsView {
        StatisticsView::new(self.inner.client.clone(), self.inner.notices.clone())
    }

    // ── One-off reads ────────────────────────────────────────────────

    /// Every stored measurement, flattened.
    pub async fn export_measurements(&self) -> Result<Vec<MeasurementExport>, CoreError> {
        self.inner
            .client
            .export_measurements()
            .await
            .map(|rows| rows.into_iter().map(MeasurementExport::from).collect())
            .map_err(|e| surface(&self.inner.notices, "Failed to export measurements", e.into()))
    }

    /// Set one key of a stored device configuration. Not tied to any view
    /// snapshot, so nothing is reloaded.
    pub async fn update_config_parameter(
        &self,
        config_id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        if key.trim().is_empty() {
            return Err(surface(
                &self.inner.notices,
                "Cannot update configuration",
                CoreError::validation("key", "must not be empty"),
            ));
        }
        match self
            .inner
            .client
            .update_config_parameter(config_id, key, value)
            .await
        {
            Ok(ack) => {
                self.inner
                    .notices
                    .success(crate::views::ack_message(&ack, "Configuration updated"));
                Ok(())
            }
            Err(e) => Err(surface(
                &self.inner.notices,
                "Failed to update configuration",
                e.into(),
            )),
        }
    }
}
