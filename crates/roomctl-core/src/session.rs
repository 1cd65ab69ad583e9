// ── Session store ──
//
// Holds the bearer token and the server-confirmed identity for one
// console. The token survives restarts through a `TokenStore`; the
// identity is always re-derived from the backend.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use roomctl_api::{ApiClient, CredentialProvider};

use crate::error::CoreError;
use crate::model::{Identity, Role};

// ── Token persistence ────────────────────────────────────────────────

/// Where the bearer token is kept between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token store; nothing outlives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<SecretString>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.token.load_full().map(|t| (*t).clone()))
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.token.store(Some(Arc::new(token.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.token.store(None);
        Ok(())
    }
}

// ── SessionStore ─────────────────────────────────────────────────────

/// Authentication state shared by the gateway client and the views.
///
/// Invariant: no token means no identity. A token alone does not make the
/// session authenticated; only a successful identity check populates
/// [`identity`](Self::identity).
pub struct SessionStore {
    token: ArcSwapOption<SecretString>,
    identity: ArcSwapOption<Identity>,
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: ArcSwapOption::empty(),
            identity: ArcSwapOption::empty(),
            store,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Log in with username and password, then confirm the identity.
    ///
    /// Returns `false` on any failure; the reason is logged, not returned.
    pub async fn login(&self, client: &ApiClient, username: &str, password: &SecretString) -> bool {
        let token = match client.login(username, password).await {
            Ok(resp) => SecretString::from(resp.access_token),
            Err(e) => {
                warn!(username, error = %e, "login failed");
                return false;
            }
        };

        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "could not persist session token");
        }
        let token = Arc::new(token);
        self.token.store(Some(Arc::clone(&token)));

        if self.confirm_identity(client, &token).await {
            info!(username, "logged in");
            true
        } else {
            false
        }
    }

    /// Re-establish a session from the persisted token, if any.
    pub async fn restore(&self, client: &ApiClient) -> bool {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no stored session token");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "could not read stored session token");
                self.logout();
                return false;
            }
        };

        let token = Arc::new(token);
        self.token.store(Some(Arc::clone(&token)));
        self.confirm_identity(client, &token).await
    }

    /// Drop the session everywhere. Idempotent; never fails.
    pub fn logout(&self) {
        let had_token = self.token.swap(None).is_some();
        self.identity.store(None);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not clear stored session token");
        }
        if had_token {
            info!("session cleared");
        }
    }

    /// Ask the backend who `token` belongs to. On failure, clears the
    /// session if `token` is still the one in use.
    ///
    /// The identity is kept only while `token` is still the session token:
    /// a logout (or another login) that lands during the request wins.
    async fn confirm_identity(&self, client: &ApiClient, token: &Arc<SecretString>) -> bool {
        match client.me().await {
            Ok(me) => {
                if !self.holds(token) {
                    debug!("session changed during identity check, discarding identity");
                    return false;
                }
                let identity = Some(Arc::new(Identity::from(me)));
                self.identity.store(identity.clone());
                // A logout between the check and the store may have cleared
                // the token after we looked; undo our write if so.
                if !self.holds(token) {
                    let _ = self.identity.compare_and_swap(&identity, None);
                    return false;
                }
                if let Some(identity) = &identity {
                    debug!(username = %identity.username, role = %identity.role, "identity confirmed");
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "identity check failed");
                if self.holds(token) {
                    self.logout();
                }
                false
            }
        }
    }

    /// `token` is the current session token (same allocation, not just equal).
    fn holds(&self, token: &Arc<SecretString>) -> bool {
        self.token
            .load()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, token))
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// A token is held and the backend has confirmed it.
    pub fn is_authenticated(&self) -> bool {
        self.has_token() && self.identity.load().is_some()
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.identity.load_full()
    }

    pub fn username(&self) -> Option<String> {
        self.identity().map(|i| i.username.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|i| i.role)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.has_token())
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

impl CredentialProvider for SessionStore {
    fn bearer_token(&self) -> Option<SecretString> {
        self.token.load_full().map(|t| (*t).clone())
    }

    fn on_unauthorized(&self) {
        self.logout();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn logout_is_idempotent() {
        let store = Arc::new(MemoryTokenStore::new());
        store.save(&SecretString::from("abc")).unwrap();
        let session = SessionStore::new(store.clone());
        session.token.store(Some(Arc::new(SecretString::from("abc"))));

        session.logout();
        session.logout();

        assert!(!session.has_token());
        assert!(session.identity().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn token_without_identity_is_not_authenticated() {
        let session = SessionStore::new(Arc::new(MemoryTokenStore::new()));
        session.token.store(Some(Arc::new(SecretString::from("abc"))));
        assert!(session.has_token());
        assert!(!session.is_authenticated());
        assert_eq!(
            session.bearer_token().map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );
    }
}
