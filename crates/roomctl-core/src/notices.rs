// ── Operator notifications ──
//
// Transient success/error messages posted by the views. The presentation
// layer decides when to show and dismiss them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared, cheaply cloneable notification list.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    inner: Arc<NoticesInner>,
}

#[derive(Debug, Default)]
struct NoticesInner {
    next_id: AtomicU64,
    pending: Mutex<Vec<Notice>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a success notice; returns its id.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message.into())
    }

    /// Post an error notice; returns its id.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message.into())
    }

    /// Notices not yet dismissed, oldest first.
    pub fn pending(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// Dismiss one notice. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|n| n.id != id);
        pending.len() != before
    }

    /// Take every pending notice, leaving the list empty.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    fn push(&self, level: NoticeLevel, message: String) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(id, %level, %message, "notice posted");
        self.lock().push(Notice { id, level, message });
        id
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
