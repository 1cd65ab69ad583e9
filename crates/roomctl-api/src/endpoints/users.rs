// User and role-management endpoints
//
// Listing lives under the admin prefix; role change and ban/unban live
// under the separately configurable roles prefix.

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{MessageResponse, UserResponse};

impl ApiClient {
    /// List all user accounts.
    ///
    /// `GET {admin}/users`
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, Error> {
        let url = self.url(&self.paths().admin_path("users"))?;
        self.get(url).await
    }

    /// Change a user's role.
    ///
    /// `GET {roles}/change_role/{username}?role=...`
    pub async fn change_role(&self, username: &str, role: &str) -> Result<MessageResponse, Error> {
        let url = self.url_with(&self.paths().roles_path("change_role"), &[username])?;
        debug!(username, role, "changing role");
        self.acknowledge(Method::GET, url, &[("role", role.to_owned())])
            .await
    }

    /// Ban a user.
    ///
    /// `POST {roles}/ban/{username}`
    pub async fn ban_user(&self, username: &str) -> Result<MessageResponse, Error> {
        let url = self.url_with(&self.paths().roles_path("ban"), &[username])?;
        debug!(username, "banning user");
        self.acknowledge(Method::POST, url, &[]).await
    }

    /// Lift a ban.
    ///
    /// `POST {roles}/unban/{username}`
    pub async fn unban_user(&self, username: &str) -> Result<MessageResponse, Error> {
        let url = self.url_with(&self.paths().roles_path("unban"), &[username])?;
        debug!(username, "unbanning user");
        self.acknowledge(Method::POST, url, &[]).await
    }
}
