//! Access decision engine — resolves a raw API key to an
//! authorization context, or denies.
//!
//! Safe to call on every request: exactly one store lookup, and at
//! most one store write (only when expiry is detected).

use chrono::Utc;
use finshare_core::error::FinshareError;
use finshare_core::models::consent::{ConsentStatus, Permission};
use finshare_core::repository::ConsentRepository;
use uuid::Uuid;

use crate::apikey;
use crate::error::AuthError;

/// Resolved identity and permission set attached to a request after a
/// credential passes verification.
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub consent_id: Uuid,
    /// Customer whose data the consent exposes.
    pub customer_id: Uuid,
    pub permissions: Vec<Permission>,
}

impl AccessContext {
    /// Whether the consent grants a specific data category. Checking
    /// this per resource operation is the handler's responsibility —
    /// the engine only proves the credential maps to a live consent.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Access decision engine over a consent store.
#[derive(Clone)]
pub struct AccessEngine<C: ConsentRepository> {
    consent_repo: C,
}

impl<C: ConsentRepository> AccessEngine<C> {
    pub fn new(consent_repo: C) -> Self {
        Self { consent_repo }
    }

    /// Resolve a raw API key to an [`AccessContext`].
    ///
    /// Expiry is detected lazily here: an authorized consent whose
    /// cutoff has passed is marked `Expired` as a side effect of the
    /// failed verification. The denial stands even if that write
    /// fails.
    pub async fn authorize(&self, raw_api_key: &str) -> Result<AccessContext, AuthError> {
        // 1. Derive the stored representation and look it up.
        let credential_hash = apikey::hash_api_key(raw_api_key);
        let consent = self
            .consent_repo
            .get_by_credential_hash(&credential_hash)
            .await
            .map_err(|e| match e {
                FinshareError::NotFound { .. } => AuthError::InvalidApiKey,
                other => AuthError::Store(other),
            })?;

        // 2. Only Authorized consents pass. AwaitingAuthorization and
        //    Revoked are reported identically.
        if consent.status != ConsentStatus::Authorized {
            return Err(AuthError::ConsentNotAuthorized);
        }

        // 3. Lazy expiry: persist the terminal status and deny.
        if consent.expires_at <= Utc::now() {
            if let Err(err) = self
                .consent_repo
                .set_status(consent.id, ConsentStatus::Expired)
                .await
            {
                tracing::warn!(
                    consent_id = %consent.id,
                    error = %err,
                    "failed to persist lazy expiry"
                );
            }
            return Err(AuthError::ConsentExpired);
        }

        Ok(AccessContext {
            consent_id: consent.id,
            customer_id: consent.customer_id,
            permissions: consent.permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_permission_checks_membership() {
        let ctx = AccessContext {
            consent_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            permissions: vec![Permission::AccountsRead, Permission::TransactionsRead],
        };
        assert!(ctx.has_permission(Permission::AccountsRead));
        assert!(ctx.has_permission(Permission::TransactionsRead));
        assert!(!ctx.has_permission(Permission::BalancesRead));
        assert!(!ctx.has_permission(Permission::PersonalIdentificationRead));
    }
}
