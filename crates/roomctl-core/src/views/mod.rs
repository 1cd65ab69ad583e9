// ── View-state controllers ──
//
// Each controller owns one server-authoritative snapshot. Loads replace
// the snapshot wholesale; mutations go through `reconcile`, which reloads
// after every successful mutation and leaves the snapshot alone on failure.

mod devices;
mod room_detail;
mod rooms;
mod statistics;
mod users;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::CoreError;
use crate::notices::Notices;

pub use devices::DevicesView;
pub use room_detail::{LoadState, RoomDetailState, RoomDetailView};
pub use rooms::RoomsView;
pub use statistics::StatisticsView;
pub use users::{UserActions, UsersView};

// ── Snapshot ─────────────────────────────────────────────────────────

/// Last known-good server state of one view, published via `watch`.
pub struct Snapshot<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T: Send + Sync + 'static> Snapshot<T> {
    pub(crate) fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Current value (cheap `Arc` clone).
    pub fn current(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.tx.subscribe()
    }

    /// Replace the whole value and notify subscribers.
    pub(crate) fn replace(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        // `send_replace` updates even with zero receivers.
        self.tx.send_replace(Arc::clone(&value));
        value
    }
}

// ── Reconciliation ───────────────────────────────────────────────────

/// Turn an error into a notice, except for `Unauthenticated`, which the
/// caller handles by sending the operator back to login.
pub(crate) fn surface(notices: &Notices, context: &str, err: CoreError) -> CoreError {
    if !err.is_unauthenticated() {
        notices.error(format!("{context}: {err}"));
    }
    err
}

/// Run a mutation and, only if it succeeds, the follow-up reload.
///
/// A failed mutation posts an error notice and skips the reload, so the
/// snapshot is untouched. A successful mutation posts `success` even when
/// the reload then fails; the reload error is returned and the snapshot
/// keeps its previous value.
pub(crate) async fn reconcile<T, R, M, L, Fut>(
    notices: &Notices,
    context: &str,
    mutation: M,
    success: impl FnOnce(&T) -> String,
    reload: L,
) -> Result<T, CoreError>
where
    M: Future<Output = Result<T, roomctl_api::Error>>,
    L: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, CoreError>>,
{
    let outcome = match mutation.await {
        Ok(outcome) => outcome,
        Err(e) => return Err(surface(notices, context, e.into())),
    };

    notices.success(success(&outcome));
    reload().await?;
    Ok(outcome)
}

/// Prefer the backend's acknowledgement text over a local default.
pub(crate) fn ack_message(ack: &roomctl_api::models::MessageResponse, fallback: &str) -> String {
    ack.message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_owned()
}
