use secrecy::SecretString;

/// Source of the bearer token attached to every request.
///
/// The gateway client never owns credentials itself: whoever constructs it
/// passes a provider in, and every request asks that provider for the
/// current token. A 401 from any endpoint is reported back through
/// [`on_unauthorized`](Self::on_unauthorized) before the call returns.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if a session exists.
    fn bearer_token(&self) -> Option<SecretString>;

    /// Called once per HTTP 401 response. Must be idempotent: concurrent
    /// requests can all fail with 401 at the same time.
    fn on_unauthorized(&self);
}

/// Provider for anonymous use (no token, 401s ignored).
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }

    fn on_unauthorized(&self) {}
}

/// Path prefixes of the backend's route groups.
///
/// The role-management routes live under a different prefix than the rest
/// of the admin API on the reference backend, so every group is
/// configurable rather than baked into the endpoint methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    /// Login and identity (`/api/auth`).
    pub auth: String,
    /// Rooms, devices, config blobs, users (`/api/admin`).
    pub admin: String,
    /// Role change and ban/unban (`/admin`).
    pub roles: String,
    /// Full path of the aggregate statistics endpoint.
    pub statistics: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            auth: "/api/auth".into(),
            admin: "/api/admin".into(),
            roles: "/admin".into(),
            statistics: "/api/analytics/statistics".into(),
        }
    }
}

impl ApiPaths {
    /// `{auth}/{path}`
    pub fn auth_path(&self, path: &str) -> String {
        join_path(&self.auth, path)
    }

    /// `{admin}/{path}`
    pub fn admin_path(&self, path: &str) -> String {
        join_path(&self.admin, path)
    }

    /// `{roles}/{path}`
    pub fn roles_path(&self, path: &str) -> String {
        join_path(&self.roles, path)
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        format!("/{path}")
    } else if prefix.starts_with('/') {
        format!("{prefix}/{path}")
    } else {
        format!("/{prefix}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let paths = ApiPaths::default();
        assert_eq!(paths.auth_path("login"), "/api/auth/login");
        assert_eq!(paths.admin_path("rooms/7"), "/api/admin/rooms/7");
        assert_eq!(paths.roles_path("ban/alice"), "/admin/ban/alice");
    }

    #[test]
    fn prefixes_are_normalized() {
        let paths = ApiPaths {
            auth: "auth/".into(),
            admin: "/v2/admin/".into(),
            roles: String::new(),
            statistics: "/stats".into(),
        };
        assert_eq!(paths.auth_path("/me"), "/auth/me");
        assert_eq!(paths.admin_path("users"), "/v2/admin/users");
        assert_eq!(paths.roles_path("unban/bob"), "/unban/bob");
    }
}
