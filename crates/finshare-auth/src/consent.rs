//! Consent lifecycle service — issuance, revocation, and owner-scoped
//! reads.

use chrono::{Duration, Utc};
use finshare_core::error::{FinshareError, FinshareResult};
use finshare_core::models::consent::{Consent, ConsentStatus, CreateConsent, Permission};
use finshare_core::repository::{ConsentRepository, CustomerRepository};
use uuid::Uuid;

use crate::apikey;
use crate::config::AuthConfig;
use crate::notify::{ConsentIssuedNotice, ConsentNotifier};

/// Input for the consent issuance flow.
#[derive(Debug, Clone)]
pub struct IssueConsentInput {
    /// Customer granting the consent.
    pub customer_id: Uuid,
    /// Granted data categories. Must be non-empty and duplicate-free.
    pub permissions: Vec<Permission>,
    /// Consent lifetime in seconds; falls back to the configured
    /// default (1 year) when absent.
    pub ttl_secs: Option<u64>,
    /// Second-party callback to receive the credential. When set, the
    /// callback must succeed for issuance to succeed.
    pub callback_url: Option<String>,
}

/// Successful issuance result.
#[derive(Debug)]
pub struct IssueConsentOutput {
    pub consent: Consent,
    /// Raw API key — observable here and nowhere else. Only its hash
    /// is persisted.
    pub api_key: String,
}

/// Consent lifecycle service.
///
/// Generic over repository and notifier implementations so that the
/// lifecycle layer has no dependency on the database crate.
pub struct ConsentService<C: ConsentRepository, U: CustomerRepository, N: ConsentNotifier> {
    consent_repo: C,
    customer_repo: U,
    notifier: N,
    config: AuthConfig,
}

impl<C: ConsentRepository, U: CustomerRepository, N: ConsentNotifier> ConsentService<C, U, N> {
    pub fn new(consent_repo: C, customer_repo: U, notifier: N, config: AuthConfig) -> Self {
        Self {
            consent_repo,
            customer_repo,
            notifier,
            config,
        }
    }

    /// Issue a new consent and mint its API key.
    ///
    /// Consents start out `Authorized`: issuance is performed by (or
    /// on behalf of) the authenticated owner, so there is no separate
    /// approval step.
    pub async fn issue(&self, input: IssueConsentInput) -> FinshareResult<IssueConsentOutput> {
        // 1. The owner must resolve to an existing customer.
        let customer = self.customer_repo.get_by_id(input.customer_id).await?;

        // 2. Validate the permission set.
        validate_permissions(&input.permissions)?;

        // 3. Mint the credential. Only the hash is handed to storage.
        let api_key = apikey::generate_api_key();
        let credential_hash = apikey::hash_api_key(&api_key);

        let ttl_secs = input.ttl_secs.unwrap_or(self.config.default_consent_ttl_secs);
        let expires_at = consent_cutoff(ttl_secs)?;

        // 4. Persist. A duplicate credential hash surfaces as
        //    AlreadyExists from the storage engine's unique index.
        let consent = self
            .consent_repo
            .create(CreateConsent {
                customer_id: customer.id,
                status: ConsentStatus::Authorized,
                permissions: input.permissions,
                expires_at,
                credential_hash,
            })
            .await?;

        // 5. Optional second-party hand-off. The credential is not
        //    considered delivered until the callback succeeds; on
        //    failure the consent is rolled back to Revoked so a
        //    half-issued key can never authorize.
        if let Some(callback_url) = &input.callback_url {
            let notice = ConsentIssuedNotice {
                consent_id: consent.id,
                api_key: api_key.clone(),
            };
            if let Err(err) = self.notifier.consent_issued(callback_url, notice).await {
                tracing::warn!(
                    consent_id = %consent.id,
                    error = %err,
                    "consent callback failed, rolling back issuance"
                );
                self.consent_repo
                    .set_status(consent.id, ConsentStatus::Revoked)
                    .await?;
                return Err(err);
            }
        }

        Ok(IssueConsentOutput { consent, api_key })
    }

    /// Revoke a consent on behalf of its owner.
    ///
    /// A consent belonging to another customer is reported as
    /// `NotFound`, indistinguishable from an absent one. Revoking an
    /// already-revoked consent is idempotent and returns it unchanged.
    pub async fn revoke(&self, customer_id: Uuid, consent_id: Uuid) -> FinshareResult<Consent> {
        let consent = self.consent_repo.get_by_id(customer_id, consent_id).await?;

        if consent.status == ConsentStatus::Revoked {
            return Ok(consent);
        }

        self.consent_repo
            .set_status(consent.id, ConsentStatus::Revoked)
            .await
    }

    /// Owner-scoped consent fetch.
    pub async fn get(&self, customer_id: Uuid, consent_id: Uuid) -> FinshareResult<Consent> {
        self.consent_repo.get_by_id(customer_id, consent_id).await
    }

    /// All consents ever granted by a customer, terminal ones
    /// included.
    pub async fn list(&self, customer_id: Uuid) -> FinshareResult<Vec<Consent>> {
        self.consent_repo.list_by_customer(customer_id).await
    }
}

/// Expiry cutoff for a consent issued now with the given lifetime.
///
/// Rejects lifetimes that do not fit the datetime arithmetic rather
/// than wrapping into the past and minting an already-expired consent.
fn consent_cutoff(ttl_secs: u64) -> FinshareResult<chrono::DateTime<Utc>> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| FinshareError::Validation {
            message: format!("ttl_secs out of range: {ttl_secs}"),
        })
}

fn validate_permissions(permissions: &[Permission]) -> FinshareResult<()> {
    if permissions.is_empty() {
        return Err(FinshareError::Validation {
            message: "permissions must not be empty".into(),
        });
    }
    for (i, p) in permissions.iter().enumerate() {
        if permissions[..i].contains(p) {
            return Err(FinshareError::Validation {
                message: format!("duplicate permission: {p}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_permission_set_is_rejected() {
        let err = validate_permissions(&[]).unwrap_err();
        assert!(matches!(err, FinshareError::Validation { .. }));
    }

    #[test]
    fn duplicate_permission_is_rejected() {
        let err = validate_permissions(&[
            Permission::AccountsRead,
            Permission::TransactionsRead,
            Permission::AccountsRead,
        ])
        .unwrap_err();
        assert!(matches!(err, FinshareError::Validation { .. }));
    }

    #[test]
    fn full_permission_set_is_accepted() {
        assert!(validate_permissions(&Permission::ALL).is_ok());
    }

    #[test]
    fn cutoff_lands_in_the_future() {
        let cutoff = consent_cutoff(3600).unwrap();
        assert!(cutoff > Utc::now());
    }

    #[test]
    fn oversized_ttl_is_rejected_not_wrapped() {
        for ttl in [u64::MAX, i64::MAX as u64 + 1, i64::MAX as u64] {
            let err = consent_cutoff(ttl).unwrap_err();
            assert!(matches!(err, FinshareError::Validation { .. }));
        }
    }
}
