//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Uniqueness invariants — most
//! importantly the consent credential hash — are enforced by UNIQUE
//! indexes in the storage engine, not by application-level
//! check-then-insert.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Customers
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD cpf ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE string;
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_cpf ON TABLE customer COLUMNS cpf UNIQUE;
DEFINE INDEX idx_customer_email ON TABLE customer COLUMNS email UNIQUE;

-- =======================================================================
-- Accounts
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD customer_id ON TABLE account TYPE string;
DEFINE FIELD kind ON TABLE account TYPE string \
    ASSERT $value IN ['checking', 'savings'];
DEFINE FIELD branch ON TABLE account TYPE string;
DEFINE FIELD number ON TABLE account TYPE string;
DEFINE FIELD bank_id ON TABLE account TYPE string;
DEFINE FIELD balance ON TABLE account TYPE float DEFAULT 0.0;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_branch_number ON TABLE account \
    COLUMNS branch, number UNIQUE;
DEFINE INDEX idx_account_customer ON TABLE account COLUMNS customer_id;

-- =======================================================================
-- Transactions
-- =======================================================================
DEFINE TABLE transaction SCHEMAFULL;
DEFINE FIELD account_id ON TABLE transaction TYPE string;
-- Booking dates are ISO YYYY-MM-DD strings so range filters compare
-- lexicographically; format is enforced by the typed Rust layer.
DEFINE FIELD date ON TABLE transaction TYPE string;
DEFINE FIELD description ON TABLE transaction TYPE string;
DEFINE FIELD amount ON TABLE transaction TYPE float \
    ASSERT $value >= 0.0;
DEFINE FIELD kind ON TABLE transaction TYPE string \
    ASSERT $value IN ['credit', 'debit'];
DEFINE FIELD category ON TABLE transaction TYPE string \
    DEFAULT 'General';
DEFINE FIELD created_at ON TABLE transaction TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_transaction_account ON TABLE transaction \
    COLUMNS account_id;

-- =======================================================================
-- Consents
-- =======================================================================
DEFINE TABLE consent SCHEMAFULL;
DEFINE FIELD customer_id ON TABLE consent TYPE string;
DEFINE FIELD status ON TABLE consent TYPE string \
    ASSERT $value IN ['AWAITING_AUTHORIZATION', 'AUTHORIZED', \
    'REVOKED', 'EXPIRED'];
DEFINE FIELD permissions ON TABLE consent TYPE array<string> \
    ASSERT array::len($value) > 0;
DEFINE FIELD expires_at ON TABLE consent TYPE datetime;
DEFINE FIELD credential_hash ON TABLE consent TYPE string;
DEFINE FIELD created_at ON TABLE consent TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE consent TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_consent_credential_hash ON TABLE consent \
    COLUMNS credential_hash UNIQUE;
DEFINE INDEX idx_consent_customer ON TABLE consent COLUMNS customer_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn consent_table_has_unique_credential_index() {
        assert!(SCHEMA_V1.contains(
            "DEFINE INDEX idx_consent_credential_hash ON TABLE consent \
    COLUMNS credential_hash UNIQUE"
        ));
    }
}
