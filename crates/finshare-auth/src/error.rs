//! Authorization error types.

use finshare_core::error::FinshareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential of either kind was presented.
    #[error("authentication required: provide a session token or API key")]
    MissingCredentials,

    /// A credential header was present but not usable (empty API key,
    /// non-Bearer Authorization scheme). Rejected before any storage
    /// access.
    #[error("malformed credential: {0}")]
    MalformedCredentials(String),

    /// The presented API key does not map to any consent.
    #[error("invalid API key")]
    InvalidApiKey,

    /// The consent exists but is not in the Authorized state — covers
    /// both awaiting-authorization and revoked without distinguishing
    /// them to the caller.
    #[error("consent not authorized")]
    ConsentNotAuthorized,

    /// The consent's expiration cutoff has passed.
    #[error("consent expired")]
    ConsentExpired,

    #[error("session token has expired")]
    TokenExpired,

    #[error("invalid session token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    /// Storage failure encountered while resolving a credential.
    #[error(transparent)]
    Store(#[from] FinshareError),
}

impl From<AuthError> for FinshareError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials
            | AuthError::MalformedCredentials(_)
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => FinshareError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::InvalidApiKey
            | AuthError::ConsentNotAuthorized
            | AuthError::ConsentExpired => FinshareError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => FinshareError::Crypto(msg),
            AuthError::Store(e) => e,
        }
    }
}
