//! Resource guard — request-time credential extraction and dispatch.
//!
//! Two parallel credential kinds are accepted at the boundary:
//! `Authorization: Bearer <jwt>` for the consent owner acting on their
//! own behalf, and `x-api-key: <raw key>` for a third party acting
//! under a consent. The guard dispatches on whichever is present and
//! fails closed: a present-but-invalid Authorization header is
//! rejected outright, never silently retried as an API key.

use finshare_core::repository::ConsentRepository;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::engine::{AccessContext, AccessEngine};
use crate::error::AuthError;
use crate::token::{self, ValidatedSession};

/// Session header: `Authorization: Bearer <token>`.
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// API-key header.
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated party behind a request.
#[derive(Debug, Clone)]
pub enum Principal {
    /// First party: the customer themselves, proven by a session
    /// token.
    Customer {
        customer_id: Uuid,
        session: ValidatedSession,
    },
    /// Third party acting under a consent, proven by an API key.
    ThirdParty(AccessContext),
}

impl Principal {
    /// The customer whose data this request may touch.
    pub fn customer_id(&self) -> Uuid {
        match self {
            Principal::Customer { customer_id, .. } => *customer_id,
            Principal::ThirdParty(ctx) => ctx.customer_id,
        }
    }
}

/// Request-time integration point between the transport layer and the
/// access decision engine.
#[derive(Clone)]
pub struct RequestGuard<C: ConsentRepository> {
    engine: AccessEngine<C>,
    config: AuthConfig,
}

impl<C: ConsentRepository> RequestGuard<C> {
    pub fn new(engine: AccessEngine<C>, config: AuthConfig) -> Self {
        Self { engine, config }
    }

    /// Authenticate a request from its credential headers.
    ///
    /// `authorization` and `api_key` are the raw values of the
    /// respective headers, when present. Malformed credentials are
    /// rejected before any storage access.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Principal, AuthError> {
        if let Some(header) = authorization {
            let raw = parse_bearer(header)?;
            let session = token::validate_session_token(raw, &self.config)?;
            let customer_id = session.customer_id()?;
            return Ok(Principal::Customer {
                customer_id,
                session,
            });
        }

        if let Some(key) = api_key {
            let key = key.trim();
            if key.is_empty() {
                return Err(AuthError::MalformedCredentials("empty API key".into()));
            }
            let ctx = self.engine.authorize(key).await?;
            return Ok(Principal::ThirdParty(ctx));
        }

        Err(AuthError::MissingCredentials)
    }
}

fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AuthError::MalformedCredentials("expected Bearer scheme".into()))?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedCredentials("empty bearer token".into()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_parsed() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        assert!(matches!(
            parse_bearer("Basic dXNlcjpwdw=="),
            Err(AuthError::MalformedCredentials(_))
        ));
    }

    #[test]
    fn empty_bearer_token_is_malformed() {
        assert!(matches!(
            parse_bearer("Bearer "),
            Err(AuthError::MalformedCredentials(_))
        ));
    }
}
