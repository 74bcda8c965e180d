//! Authentication endpoints.

use reqwest::Method;
use tracing::instrument;

use easybuy_core::Email;

use crate::error::ApiError;
use crate::session::{AuthApi, CurrentUser};

use super::ApiClient;
use super::types::{AuthResponseBody, AuthSuccess, LoginBody, RegisterBody, UserRecord, convert_user};

impl ApiClient {
    /// `POST /api/auth/login` - exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the backend rejects the credentials
    /// (the session manager maps this to `InvalidCredentials`), plus the
    /// usual transport and server errors.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<AuthSuccess, ApiError> {
        let body = LoginBody {
            email: email.as_str(),
            password,
        };
        let response: AuthResponseBody = self
            .execute(self.request(Method::POST, "/api/auth/login").json(&body))
            .await?;

        Ok(AuthSuccess {
            token: response.token,
            user: convert_user(response.user)?,
        })
    }

    /// `POST /api/auth/register` - create an account and log it in.
    ///
    /// # Errors
    ///
    /// Transport and server errors; `Rejected` with the backend's message
    /// when the email is already taken.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthSuccess, ApiError> {
        let body = RegisterBody {
            name,
            email: email.as_str(),
            password,
        };
        let response: AuthResponseBody = self
            .execute(self.request(Method::POST, "/api/auth/register").json(&body))
            .await?;

        Ok(AuthSuccess {
            token: response.token,
            user: convert_user(response.user)?,
        })
    }

    /// `GET /api/auth/verify` - check the current bearer token.
    ///
    /// Any non-2xx answer means the token is no longer good.
    ///
    /// # Errors
    ///
    /// [`ApiError::TokenInvalid`] when the backend rejects the token,
    /// [`ApiError::Network`] when it cannot be reached.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<CurrentUser, ApiError> {
        let record: UserRecord = self
            .execute(self.request(Method::GET, "/api/auth/verify"))
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized
                | ApiError::NotFound(_)
                | ApiError::Rejected { .. } => ApiError::TokenInvalid,
                other => other,
            })?;

        convert_user(record)
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, email: &Email, password: &str) -> Result<AuthSuccess, ApiError> {
        Self::login(self, email, password).await
    }

    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthSuccess, ApiError> {
        Self::register(self, name, email, password).await
    }

    async fn verify(&self) -> Result<CurrentUser, ApiError> {
        Self::verify(self).await
    }
}
