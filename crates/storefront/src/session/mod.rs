//! Session state shared between the session manager and the API client.
//!
//! [`SessionHandle`] is the single authority on "who is logged in". The
//! manager drives transitions (login, register, logout, verification); the
//! API client reads the bearer token from it and clears it on any 401.
//!
//! # Invariant
//!
//! A non-null user implies a verified token. Token and user are persisted
//! together and read back both-or-nothing: if either key is missing or
//! expired on restore, the remainder is cleared rather than surfaced.

mod manager;

pub use manager::{AuthApi, RegisterForm, SessionManager};

use std::sync::{Arc, RwLock};

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use easybuy_core::{Email, Role, UserId};

use crate::storage::Storage;

/// How long persisted credentials stay valid without a fresh login.
const SESSION_TTL_DAYS: i64 = 7;

/// How long a remembered redirect target survives unused.
const REDIRECT_TTL_MINUTES: i64 = 5;

/// Storage keys for persisted session state.
///
/// The names match what the browser build of the storefront kept in cookies,
/// so a support engineer inspecting the state file sees familiar fields.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the serialized user record.
    pub const USER: &str = "userData";

    /// Key for the user's role.
    pub const ROLE: &str = "userRole";

    /// Key for the post-login redirect target.
    pub const REDIRECT: &str = "redirectUrl";
}

/// The verified identity of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Role, normalized at session creation.
    pub role: Role,
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    /// No session.
    #[default]
    Anonymous,
    /// Persisted credentials found; backend verification in flight.
    /// Dependent views must not render authenticated content yet.
    Verifying,
    /// Verified session.
    Authenticated,
}

/// A point-in-time copy of the session state for rendering decisions.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: AuthPhase,
    /// The verified user, present only in [`AuthPhase::Authenticated`].
    pub user: Option<CurrentUser>,
}

impl SessionSnapshot {
    /// Whether a verified user is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether startup verification is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Verifying
    }
}

#[derive(Default)]
struct SessionState {
    phase: AuthPhase,
    user: Option<CurrentUser>,
    token: Option<SecretString>,
}

/// Shared, cloneable handle to the session state.
///
/// Cheap to clone via `Arc`; every clone observes the same state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<dyn Storage>,
    state: RwLock<SessionState>,
}

impl SessionHandle {
    /// Create an anonymous session over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage,
                state: RwLock::new(SessionState::default()),
            }),
        }
    }

    /// A copy of the current phase and user.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            phase: state.phase,
            user: state.user.clone(),
        }
    }

    /// The bearer token to attach to outgoing requests, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.read()
            .token
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
    }

    /// Install a fresh session from a login or register response.
    ///
    /// State and persisted keys are written together; other components only
    /// ever observe the complete pair via [`Self::snapshot`].
    pub fn establish(&self, token: String, user: CurrentUser) {
        {
            let mut state = self.write();
            state.phase = AuthPhase::Authenticated;
            state.token = Some(SecretString::from(token.clone()));
            state.user = Some(user.clone());
        }

        let ttl = Some(Duration::days(SESSION_TTL_DAYS));
        self.persist(keys::TOKEN, token, ttl);
        match serde_json::to_string(&user) {
            Ok(json) => self.persist(keys::USER, json, ttl),
            Err(err) => warn!(error = %err, "failed to serialize user for persistence"),
        }
        self.persist(keys::ROLE, user.role.to_string(), ttl);

        info!(user = %user.email, role = %user.role, "session established");
    }

    /// Load persisted credentials and enter [`AuthPhase::Verifying`].
    ///
    /// Returns the stored user when both token and user were found. A
    /// partial pair (one key missing or expired) is cleared and treated as
    /// no session.
    pub(crate) fn begin_restore(&self) -> Option<CurrentUser> {
        let token = self.inner.storage.get(keys::TOKEN);
        let user_json = self.inner.storage.get(keys::USER);

        let (Some(token), Some(user_json)) = (token, user_json) else {
            self.clear();
            return None;
        };

        let user: CurrentUser = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "persisted user record is corrupt, discarding session");
                self.clear();
                return None;
            }
        };

        let mut state = self.write();
        state.phase = AuthPhase::Verifying;
        state.token = Some(SecretString::from(token));
        state.user = None;

        Some(user)
    }

    /// Promote a verifying session to authenticated with the server's copy
    /// of the user record.
    pub(crate) fn confirm(&self, user: CurrentUser) {
        {
            let mut state = self.write();
            state.phase = AuthPhase::Authenticated;
            state.user = Some(user.clone());
        }

        // Refresh the persisted copy; the token entry keeps its original expiry
        let ttl = Some(Duration::days(SESSION_TTL_DAYS));
        match serde_json::to_string(&user) {
            Ok(json) => self.persist(keys::USER, json, ttl),
            Err(err) => warn!(error = %err, "failed to serialize user for persistence"),
        }
        self.persist(keys::ROLE, user.role.to_string(), ttl);
    }

    /// Drop the session, in memory and on disk. Safe to call at any time,
    /// including when no session exists.
    pub fn clear(&self) {
        let had_session = {
            let mut state = self.write();
            let had = state.token.is_some() || state.user.is_some();
            *state = SessionState::default();
            had
        };

        self.inner.storage.remove(keys::TOKEN);
        self.inner.storage.remove(keys::USER);
        self.inner.storage.remove(keys::ROLE);

        if had_session {
            info!("session cleared");
        }
    }

    /// Remember the path a visitor was denied, for one post-login redirect.
    pub fn remember_redirect(&self, path: &str) {
        self.persist(
            keys::REDIRECT,
            path.to_owned(),
            Some(Duration::minutes(REDIRECT_TTL_MINUTES)),
        );
    }

    /// Consume the remembered redirect target, if still fresh.
    #[must_use]
    pub fn take_redirect(&self) -> Option<String> {
        let target = self.inner.storage.get(keys::REDIRECT);
        if target.is_some() {
            self.inner.storage.remove(keys::REDIRECT);
        }
        target
    }

    fn persist(&self, key: &str, value: String, ttl: Option<Duration>) {
        if let Err(err) = self.inner.storage.set(key, value, ttl) {
            warn!(key, error = %err, "failed to persist session state");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
