//! Unified error type for backend API operations.
//!
//! Every failure surfaces exactly once to the caller; there is no retry
//! logic anywhere in this crate. Call sites render these as inline messages.

use thiserror::Error;

/// Errors that can occur when talking to the Easy Buy backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the supplied credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Client-side validation failed before any network call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("unable to reach the server: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a 5xx status.
    #[error("server error (HTTP {status})")]
    Server {
        /// The HTTP status code received.
        status: u16,
    },

    /// The persisted session token failed verification.
    #[error("session is no longer valid")]
    TokenInvalid,

    /// A 401 on any authenticated call. Intercepted centrally: the shared
    /// session is already cleared by the time this reaches the caller.
    #[error("unauthorized")]
    Unauthorized,

    /// An image upload was rejected.
    #[error("upload failed: {0}")]
    Upload(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response parsed but carried a value the domain rejects
    /// (e.g. a negative price or an invalid email).
    #[error("invalid field in response: {0}")]
    InvalidData(String),

    /// Any other non-success response.
    #[error("unexpected response (HTTP {status}): {message}")]
    Rejected {
        /// The HTTP status code received.
        status: u16,
        /// Truncated response body.
        message: String,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err)
    }
}
