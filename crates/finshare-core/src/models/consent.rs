//! Consent domain model — a customer-granted, time-bounded,
//! scope-limited authorization for a third party to read financial
//! data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::FinshareError;

/// Data categories a consent can authorize reading.
///
/// Closed enumeration — permission sets are validated against it at
/// issuance and never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    AccountsRead,
    BalancesRead,
    TransactionsRead,
    PersonalIdentificationRead,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::AccountsRead,
        Permission::BalancesRead,
        Permission::TransactionsRead,
        Permission::PersonalIdentificationRead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AccountsRead => "ACCOUNTS_READ",
            Permission::BalancesRead => "BALANCES_READ",
            Permission::TransactionsRead => "TRANSACTIONS_READ",
            Permission::PersonalIdentificationRead => "PERSONAL_IDENTIFICATION_READ",
        }
    }
}

impl FromStr for Permission {
    type Err = FinshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCOUNTS_READ" => Ok(Permission::AccountsRead),
            "BALANCES_READ" => Ok(Permission::BalancesRead),
            "TRANSACTIONS_READ" => Ok(Permission::TransactionsRead),
            "PERSONAL_IDENTIFICATION_READ" => Ok(Permission::PersonalIdentificationRead),
            other => Err(FinshareError::Validation {
                message: format!("unknown permission: {other}"),
            }),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent lifecycle status.
///
/// Status only moves forward: `Revoked` and `Expired` are terminal,
/// and nothing transitions back into `AwaitingAuthorization` or
/// `Authorized`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    AwaitingAuthorization,
    Authorized,
    Revoked,
    Expired,
}

impl ConsentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConsentStatus::Revoked | ConsentStatus::Expired)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consent {
    pub id: Uuid,
    /// Customer who granted the consent. Immutable after creation.
    pub customer_id: Uuid,
    pub status: ConsentStatus,
    pub permissions: Vec<Permission>,
    /// Absolute cutoff after which the consent is unusable regardless
    /// of stored status.
    pub expires_at: DateTime<Utc>,
    /// SHA-256 hex of the raw API key. The raw key itself is never
    /// persisted.
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsent {
    pub customer_id: Uuid,
    pub status: ConsentStatus,
    pub permissions: Vec<Permission>,
    pub expires_at: DateTime<Utc>,
    pub credential_hash: String,
}
