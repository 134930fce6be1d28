//! Process-wide session state.
//!
//! A single [`SessionStore`] is shared (by cloning) between the API client
//! and every controller. State changes only through [`SessionAction`]s and
//! every change is broadcast to subscribers via a `tokio::sync::watch`
//! channel. The token lives only for the life of the process.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use vetrina_core::Role;

/// Snapshot of the session.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    role: Option<Role>,
    guest: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("guest", &self.guest)
            .finish()
    }
}

impl Session {
    /// Whether a token is held.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Role issued with the token.
    #[must_use]
    pub const fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Whether anonymous catalog browsing was granted.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.guest
    }

    /// Only a signed-in `USER` may hold a cart and check out.
    #[must_use]
    pub fn can_shop(&self) -> bool {
        self.is_logged_in() && self.role == Some(Role::User)
    }

    /// Whether the admin console is available.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_logged_in() && self.role == Some(Role::Admin)
    }

    /// Whether the catalog may be shown at all.
    #[must_use]
    pub const fn can_browse(&self) -> bool {
        self.is_logged_in() || self.guest
    }

    /// Bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Username read from the token's `sub` claim. Display only: the
    /// signature is not checked and any decode failure yields `None`.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        let payload = self.token()?.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        claims.get("sub")?.as_str().map(str::to_string)
    }

    fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::SignedIn { token, role } => {
                self.token = Some(token);
                self.role = Some(role);
                self.guest = false;
                true
            }
            SessionAction::SignedOut => {
                let changed = self.token.is_some() || self.role.is_some();
                self.token = None;
                self.role = None;
                changed
            }
            SessionAction::GuestEntered => !std::mem::replace(&mut self.guest, true),
            SessionAction::GuestLeft => std::mem::replace(&mut self.guest, false),
        }
    }
}

/// The only ways the session can change.
pub enum SessionAction {
    /// A token was issued. Ends guest access.
    SignedIn { token: SecretString, role: Role },
    /// Token and role discarded. Guest access is left as it was.
    SignedOut,
    /// Anonymous catalog browsing granted.
    GuestEntered,
    /// Anonymous catalog browsing revoked.
    GuestLeft,
}

impl std::fmt::Debug for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedIn { role, .. } => f
                .debug_struct("SignedIn")
                .field("token", &"[REDACTED]")
                .field("role", role)
                .finish(),
            Self::SignedOut => f.write_str("SignedOut"),
            Self::GuestEntered => f.write_str("GuestEntered"),
            Self::GuestLeft => f.write_str("GuestLeft"),
        }
    }
}

/// Shared, observable session container.
#[derive(Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionStore")
            .field(&*self.sender.borrow())
            .finish()
    }
}

impl SessionStore {
    /// An empty session: not signed in, not a guest.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Session::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Apply an action. Subscribers are notified only if something changed.
    pub fn dispatch(&self, action: SessionAction) {
        tracing::debug!(?action, "Session action");
        self.sender.send_if_modified(|session| session.apply(action));
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Receiver that observes every subsequent change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.sender.borrow().token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    fn sign_in(store: &SessionStore, role: Role) {
        store.dispatch(SessionAction::SignedIn {
            token: SecretString::from(jwt(r#"{"sub":"anna","exp":1}"#)),
            role,
        });
    }

    #[test]
    fn test_sign_in_ends_guest_access() {
        let store = SessionStore::new();
        store.dispatch(SessionAction::GuestEntered);
        assert!(store.snapshot().is_guest());
        assert!(store.snapshot().can_browse());

        sign_in(&store, Role::User);
        let session = store.snapshot();
        assert!(!session.is_guest());
        assert!(session.can_shop());
        assert!(!session.is_admin());
        assert_eq!(session.username().as_deref(), Some("anna"));
    }

    #[test]
    fn test_sign_out_keeps_guest_flag() {
        let store = SessionStore::new();
        sign_in(&store, Role::Admin);
        store.dispatch(SessionAction::GuestEntered);
        store.dispatch(SessionAction::SignedOut);
        let session = store.snapshot();
        assert!(!session.is_logged_in());
        assert!(session.role().is_none());
        assert!(session.is_guest());
    }

    #[test]
    fn test_admin_cannot_shop() {
        let store = SessionStore::new();
        sign_in(&store, Role::Admin);
        assert!(store.snapshot().is_admin());
        assert!(!store.snapshot().can_shop());
    }

    #[test]
    fn test_username_soft_decode_failures() {
        let store = SessionStore::new();
        store.dispatch(SessionAction::SignedIn {
            token: SecretString::from("not-a-jwt"),
            role: Role::User,
        });
        assert_eq!(store.snapshot().username(), None);

        store.dispatch(SessionAction::SignedIn {
            token: SecretString::from(jwt(r#"{"role":"USER"}"#)),
            role: Role::User,
        });
        assert_eq!(store.snapshot().username(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::new();
        sign_in(&store, Role::User);
        let debug = format!("{store:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("eyJ"));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.dispatch(SessionAction::SignedOut);
        assert!(!rx.has_changed().expect("sender alive"));

        sign_in(&store, Role::User);
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow_and_update().can_shop());

        store.dispatch(SessionAction::SignedOut);
        rx.changed().await.expect("sender alive");
        assert!(!rx.borrow_and_update().is_logged_in());
    }
}
