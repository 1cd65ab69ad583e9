// ── Users and role management ──
//
// The role gate here only decides which actions to offer. The backend
// enforces authorization on its own.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use roomctl_api::ApiClient;

use super::{Snapshot, ack_message, reconcile, surface};
use crate::error::CoreError;
use crate::model::{Role, User};
use crate::notices::Notices;
use crate::session::SessionStore;

/// Actions offered for one user row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserActions {
    pub promote: bool,
    pub ban: bool,
    pub unban: bool,
}

impl UserActions {
    pub fn any(&self) -> bool {
        self.promote || self.ban || self.unban
    }
}

pub struct UsersView {
    client: ApiClient,
    session: Arc<SessionStore>,
    notices: Notices,
    snapshot: Snapshot<Vec<User>>,
}

impl UsersView {
    pub(crate) fn new(client: ApiClient, session: Arc<SessionStore>, notices: Notices) -> Self {
        Self {
            client,
            session,
            notices,
            snapshot: Snapshot::new(Vec::new()),
        }
    }

    pub fn current(&self) -> Arc<Vec<User>> {
        self.snapshot.current()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<Vec<User>>> {
        self.snapshot.subscribe()
    }

    pub async fn load(&self) -> Result<Arc<Vec<User>>, CoreError> {
        match self.client.list_users().await {
            Ok(users) => {
                debug!(count = users.len(), "users loaded");
                Ok(self
                    .snapshot
                    .replace(users.into_iter().map(User::from).collect()))
            }
            Err(e) => Err(surface(&self.notices, "Failed to load users", e.into())),
        }
    }

    /// Users whose name contains `term`, ignoring case. Local only.
    pub fn filter(&self, term: &str) -> Vec<User> {
        let term = term.to_lowercase();
        self.snapshot
            .current()
            .iter()
            .filter(|u| u.username.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    /// Actions available for `user`: only an admin session acting on a
    /// manager gets any, then ban or unban depending on the ban flag.
    pub fn actions_for(&self, user: &User) -> UserActions {
        if self.session.role() != Some(Role::Admin) || user.role != Role::Manager {
            return UserActions::default();
        }
        UserActions {
            promote: true,
            ban: !user.is_banned,
            unban: user.is_banned,
        }
    }

    /// Promote a manager to admin, then reload.
    pub async fn promote(&self, username: &str) -> Result<(), CoreError> {
        self.gate(username, "promote", |a| a.promote)?;
        reconcile(
            &self.notices,
            "Failed to promote user",
            self.client.change_role(username, Role::Admin.as_ref()),
            |ack| ack_message(ack, &format!("{username} promoted to admin")),
            || self.load(),
        )
        .await
        .map(drop)
    }

    /// Ban a user, then reload.
    pub async fn ban(&self, username: &str) -> Result<(), CoreError> {
        self.gate(username, "ban", |a| a.ban)?;
        reconcile(
            &self.notices,
            "Failed to ban user",
            self.client.ban_user(username),
            |ack| ack_message(ack, &format!("{username} banned")),
            || self.load(),
        )
        .await
        .map(drop)
    }

    /// Lift a ban, then reload.
    pub async fn unban(&self, username: &str) -> Result<(), CoreError> {
        self.gate(username, "unban", |a| a.unban)?;
        reconcile(
            &self.notices,
            "Failed to unban user",
            self.client.unban_user(username),
            |ack| ack_message(ack, &format!("{username} unbanned")),
            || self.load(),
        )
        .await
        .map(drop)
    }

    /// Refuse, without any request, an action not offered for `username`
    /// in the current snapshot.
    fn gate(
        &self,
        username: &str,
        action: &str,
        offered: impl FnOnce(&UserActions) -> bool,
    ) -> Result<(), CoreError> {
        let snapshot = self.snapshot.current();
        let allowed = snapshot
            .iter()
            .find(|u| u.username == username)
            .is_some_and(|user| offered(&self.actions_for(user)));

        if allowed {
            Ok(())
        } else {
            Err(surface(
                &self.notices,
                "Action refused",
                CoreError::forbidden(format!("{action} {username}")),
            ))
        }
    }
}
