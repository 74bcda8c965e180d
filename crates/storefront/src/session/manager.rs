//! Session lifecycle operations.
//!
//! The manager owns every auth state transition. Navigation is reported as a
//! [`Destination`] value for the routing layer to act on; nothing here
//! touches a UI.

use std::time::Duration;

use tracing::{info, instrument, warn};

use easybuy_core::Email;

use crate::api::ApiClient;
use crate::api::types::AuthSuccess;
use crate::error::ApiError;
use crate::routing::Destination;

use super::{CurrentUser, SessionHandle};

/// Bound on the startup verification round-trip.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// The backend auth calls the session manager depends on.
///
/// [`ApiClient`] is the production implementation; tests substitute a stub
/// so lifecycle rules can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Exchange credentials for a token and user record.
    async fn login(&self, email: &Email, password: &str) -> Result<AuthSuccess, ApiError>;

    /// Create an account and log it in.
    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthSuccess, ApiError>;

    /// Check the current bearer token against the backend.
    async fn verify(&self) -> Result<CurrentUser, ApiError>;
}

/// A registration form, validated client-side before any network call.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Confirmation copy of the password.
    pub confirm_password: String,
}

impl RegisterForm {
    /// Validate the form and parse the email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on empty fields, a malformed email,
    /// or a password/confirmation mismatch. No network call has been made
    /// when this fails.
    pub fn validate(&self) -> Result<Email, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("name is required".to_owned()));
        }
        if self.password.is_empty() {
            return Err(ApiError::Validation("password is required".to_owned()));
        }
        if self.password != self.confirm_password {
            return Err(ApiError::Validation("passwords do not match".to_owned()));
        }
        Email::parse(&self.email).map_err(|e| ApiError::Validation(e.to_string()))
    }
}

/// Drives login, register, logout, and startup verification.
pub struct SessionManager<A = ApiClient> {
    api: A,
    session: SessionHandle,
    verify_timeout: Duration,
}

impl<A: AuthApi> SessionManager<A> {
    /// Create a manager over the given API and shared session.
    #[must_use]
    pub const fn new(api: A, session: SessionHandle) -> Self {
        Self {
            api,
            session,
            verify_timeout: VERIFY_TIMEOUT,
        }
    }

    /// Override the verification timeout (tests).
    #[must_use]
    pub const fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// The shared session this manager drives.
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Log in with email and password.
    ///
    /// On success the session is established and persisted; the caller asks
    /// the routing policy where to send the user next.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for empty fields or a malformed email,
    /// [`ApiError::InvalidCredentials`] when the backend rejects the pair,
    /// [`ApiError::Network`] / [`ApiError::Server`] for transport and 5xx
    /// failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_owned(),
            ));
        }
        let email = Email::parse(email).map_err(|e| ApiError::Validation(e.to_string()))?;

        let success = self
            .api
            .login(&email, password)
            .await
            .map_err(|err| match err {
                // A 401 from the login endpoint means bad credentials,
                // not an expired session
                ApiError::Unauthorized => ApiError::InvalidCredentials,
                other => other,
            })?;

        self.session
            .establish(success.token, success.user.clone());
        Ok(success.user)
    }

    /// Register a new account.
    ///
    /// Password confirmation is checked client-side; a mismatch fails
    /// before any network call. Success behaves exactly like login.
    ///
    /// # Errors
    ///
    /// As [`Self::login`], plus [`ApiError::Validation`] for form problems.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: RegisterForm) -> Result<CurrentUser, ApiError> {
        let email = form.validate()?;

        let success = self.api.register(&form.name, &email, &form.password).await?;

        self.session
            .establish(success.token, success.user.clone());
        Ok(success.user)
    }

    /// Verify a persisted session at application start.
    ///
    /// When no complete credential pair is stored this resolves immediately
    /// to an anonymous session. Otherwise the token is checked against the
    /// backend within the verification timeout; any failure - invalid token,
    /// transport error, timeout - clears the persisted state so a stale
    /// "logged in" view can never appear.
    #[instrument(skip(self))]
    pub async fn verify_session(&self) -> Option<CurrentUser> {
        let stored = self.session.begin_restore()?;
        info!(user = %stored.email, "verifying persisted session");

        match tokio::time::timeout(self.verify_timeout, self.api.verify()).await {
            Ok(Ok(user)) => {
                self.session.confirm(user.clone());
                Some(user)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "session verification failed, clearing session");
                self.session.clear();
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.verify_timeout.as_secs(),
                    "session verification timed out, clearing session"
                );
                self.session.clear();
                None
            }
        }
    }

    /// Log out unconditionally.
    ///
    /// Idempotent: calling with no session is fine. The cart is untouched;
    /// it is not tied to authentication.
    pub fn logout(&self) -> Destination {
        self.session.clear();
        Destination::Landing
    }
}
