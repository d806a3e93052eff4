//! Session store: who is logged in, and with which bearer token.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};

use super::persistent::read_json;
use crate::models::{Session, User};
use crate::observable::{Observable, Subscription};
use crate::storage::{KeyValueStore, keys};

/// The current session, persisted under the `user` and `token` keys.
///
/// Alongside the session it publishes a derived `is_admin` flag that is
/// republished on every session change.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: Arc<dyn KeyValueStore>,
    session: Observable<Session>,
    is_admin: Observable<bool>,
    token: RwLock<Option<SecretString>>,
    // Keeps `is_admin` following `session`
    _admin_link: Subscription,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.inner.session.get())
            .field("token", &self.token().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restore the session from storage.
    ///
    /// A missing or malformed `user` entry means anonymous; a token without a
    /// user is ignored.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (session, token) = match read_json::<User>(storage.as_ref(), keys::USER) {
            Some(user) => {
                let token = storage
                    .get(keys::TOKEN)
                    .filter(|t| !t.is_empty())
                    .map(SecretString::from);
                (Session::Authenticated(user), token)
            }
            None => (Session::Anonymous, None),
        };

        let session = Observable::new(session);
        let (is_admin, admin_link) = session.map(Session::is_admin);

        Self {
            inner: Arc::new(SessionStoreInner {
                storage,
                session,
                is_admin,
                token: RwLock::new(token),
                _admin_link: admin_link,
            }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.session.get()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.current().user().cloned()
    }

    /// The bearer token, if one was issued.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    /// Whether the logged-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.is_admin.get()
    }

    /// Start a session for `user`, persisting the user and token.
    pub fn sign_in(&self, user: User, token: Option<String>) {
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.inner.storage.set(keys::USER, &json) {
                    tracing::warn!(error = %e, "Failed to persist user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user"),
        }
        if let Err(e) = self
            .inner
            .storage
            .set(keys::TOKEN, token.as_deref().unwrap_or_default())
        {
            tracing::warn!(error = %e, "Failed to persist token");
        }

        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.map(SecretString::from);

        tracing::info!(username = %user.username, role = %user.role, "Signed in");
        self.inner.session.set(Session::Authenticated(user));
    }

    /// Replace the logged-in user, keeping the current token.
    pub fn set_user(&self, user: User) {
        self.sign_in(user, self.bearer());
    }

    /// End the session and remove it from storage. Never fails.
    pub fn clear(&self) {
        for key in [keys::USER, keys::TOKEN] {
            if let Err(e) = self.inner.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear session key");
            }
        }
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;

        if self.is_authenticated() {
            tracing::info!("Session cleared");
        }
        self.inner.session.set(Session::Anonymous);
    }

    /// Subscribe to session changes. The current session is delivered immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.inner.session.subscribe(callback)
    }

    /// Subscribe to the derived admin flag.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_admin<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.is_admin.subscribe(callback)
    }

    /// Expose the token for building an `Authorization` header.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token()
            .map(|t| t.expose_secret().to_owned())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use mlk_shop_core::Role;

    use super::*;
    use crate::storage::MemoryStore;

    fn admin() -> User {
        User {
            username: "admin".to_string(),
            email: None,
            role: Role::Admin,
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(!store.is_authenticated());
        assert!(!store.is_admin());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_sign_in_persists_and_restores() {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage.clone());
        store.sign_in(admin(), Some("t1".to_string()));

        assert!(store.is_admin());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("t1"));

        let restored = SessionStore::new(storage);
        assert_eq!(restored.user(), Some(admin()));
        assert_eq!(restored.bearer().as_deref(), Some("t1"));
    }

    #[test]
    fn test_clear_removes_keys() {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage.clone());
        store.sign_in(admin(), Some("t1".to_string()));
        store.clear();

        assert!(!store.is_authenticated());
        assert!(!storage.contains(keys::USER));
        assert!(!storage.contains(keys::TOKEN));
        assert!(store.bearer().is_none());
        // Clearing twice is fine
        store.clear();
    }

    #[test]
    fn test_is_admin_republished_on_change() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        let flags = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&flags);
        let _sub = store.subscribe_admin(move |flag| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(*flag);
        });

        store.sign_in(admin(), None);
        store.clear();

        let got = flags.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(got, vec![false, true, false]);
    }

    #[test]
    fn test_malformed_user_is_anonymous() {
        let storage = Arc::new(MemoryStore::with_entries([
            (keys::USER, "{\"username\":"),
            (keys::TOKEN, "stale"),
        ]));
        let store = SessionStore::new(storage);
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        store.sign_in(admin(), Some("super-secret-token".to_string()));
        let debug = format!("{store:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }
}
