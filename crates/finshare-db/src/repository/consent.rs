//! SurrealDB implementation of [`ConsentRepository`].
//!
//! Only the credential hash ever reaches this layer — the raw API key
//! stays with the lifecycle service. The unique index on
//! `credential_hash` is the storage-enforced invariant behind
//! credential resolution.

use chrono::{DateTime, Utc};
use finshare_core::error::FinshareResult;
use finshare_core::models::consent::{Consent, ConsentStatus, CreateConsent, Permission};
use finshare_core::repository::ConsentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ConsentRow {
    customer_id: String,
    status: String,
    permissions: Vec<String>,
    expires_at: DateTime<Utc>,
    credential_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ConsentRowWithId {
    record_id: String,
    customer_id: String,
    status: String,
    permissions: Vec<String>,
    expires_at: DateTime<Utc>,
    credential_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<ConsentStatus, DbError> {
    match s {
        "AWAITING_AUTHORIZATION" => Ok(ConsentStatus::AwaitingAuthorization),
        "AUTHORIZED" => Ok(ConsentStatus::Authorized),
        "REVOKED" => Ok(ConsentStatus::Revoked),
        "EXPIRED" => Ok(ConsentStatus::Expired),
        other => Err(DbError::Decode(format!(
            "unknown consent status: {other}"
        ))),
    }
}

fn status_to_str(s: &ConsentStatus) -> &'static str {
    match s {
        ConsentStatus::AwaitingAuthorization => "AWAITING_AUTHORIZATION",
        ConsentStatus::Authorized => "AUTHORIZED",
        ConsentStatus::Revoked => "REVOKED",
        ConsentStatus::Expired => "EXPIRED",
    }
}

fn parse_permissions(raw: Vec<String>) -> Result<Vec<Permission>, DbError> {
    raw.iter()
        .map(|s| {
            s.parse::<Permission>()
                .map_err(|_| DbError::Decode(format!("unknown permission: {s}")))
        })
        .collect()
}

fn permissions_to_strings(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_string()).collect()
}

fn row_to_consent(row: ConsentRow, id: Uuid) -> Result<Consent, DbError> {
    let customer_id = Uuid::parse_str(&row.customer_id)
        .map_err(|e| DbError::Decode(format!("invalid customer UUID: {e}")))?;
    Ok(Consent {
        id,
        customer_id,
        status: parse_status(&row.status)?,
        permissions: parse_permissions(row.permissions)?,
        expires_at: row.expires_at,
        credential_hash: row.credential_hash,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl ConsentRowWithId {
    fn try_into_consent(self) -> Result<Consent, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Decode(format!("invalid customer UUID: {e}")))?;
        Ok(Consent {
            id,
            customer_id,
            status: parse_status(&self.status)?,
            permissions: parse_permissions(self.permissions)?,
            expires_at: self.expires_at,
            credential_hash: self.credential_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Consent repository.
#[derive(Clone)]
pub struct SurrealConsentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealConsentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ConsentRepository for SurrealConsentRepository<C> {
    async fn create(&self, input: CreateConsent) -> FinshareResult<Consent> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('consent', $id) SET \
                 customer_id = $customer_id, \
                 status = $status, \
                 permissions = $permissions, \
                 expires_at = $expires_at, \
                 credential_hash = $credential_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("customer_id", input.customer_id.to_string()))
            .bind(("status", status_to_str(&input.status).to_string()))
            .bind(("permissions", permissions_to_strings(&input.permissions)))
            .bind(("expires_at", input.expires_at))
            .bind(("credential_hash", input.credential_hash))
            .await
            .map_err(|e| DbError::from_write("consent", e))?;

        // Unique index violations (duplicate credential hash) surface
        // from the statement result, not the transport call.
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("consent", e))?;

        let rows: Vec<ConsentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "consent".into(),
            id: id_str,
        })?;

        Ok(row_to_consent(row, id)?)
    }

    async fn get_by_id(&self, customer_id: Uuid, id: Uuid) -> FinshareResult<Consent> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('consent', $id) \
                 WHERE customer_id = $customer_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("customer_id", customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ConsentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "consent".into(),
            id: id_str,
        })?;

        Ok(row_to_consent(row, id)?)
    }

    async fn get_by_credential_hash(&self, credential_hash: &str) -> FinshareResult<Consent> {
        let hash_owned = credential_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM consent \
                 WHERE credential_hash = $credential_hash",
            )
            .bind(("credential_hash", hash_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ConsentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "consent".into(),
            // The hash is a derived secret representation; it is not
            // echoed back in the error.
            id: "credential".into(),
        })?;

        Ok(row.try_into_consent()?)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> FinshareResult<Vec<Consent>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM consent \
                 WHERE customer_id = $customer_id \
                 ORDER BY created_at ASC",
            )
            .bind(("customer_id", customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ConsentRowWithId> = result.take(0).map_err(DbError::from)?;

        let consents = rows
            .into_iter()
            .map(|row| row.try_into_consent())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(consents)
    }

    async fn set_status(&self, id: Uuid, status: ConsentStatus) -> FinshareResult<Consent> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('consent', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_str(&status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ConsentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "consent".into(),
            id: id_str,
        })?;

        Ok(row_to_consent(row, id)?)
    }
}
