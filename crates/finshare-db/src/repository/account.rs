//! SurrealDB implementation of [`AccountRepository`].

use chrono::{DateTime, Utc};
use finshare_core::error::FinshareResult;
use finshare_core::models::account::{Account, AccountKind, CreateAccount};
use finshare_core::repository::AccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AccountRow {
    customer_id: String,
    kind: String,
    branch: String,
    number: String,
    bank_id: String,
    balance: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    customer_id: String,
    kind: String,
    branch: String,
    number: String,
    bank_id: String,
    balance: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_kind(s: &str) -> Result<AccountKind, DbError> {
    match s {
        "checking" => Ok(AccountKind::Checking),
        "savings" => Ok(AccountKind::Savings),
        other => Err(DbError::Decode(format!("unknown account kind: {other}"))),
    }
}

fn kind_to_str(k: &AccountKind) -> &'static str {
    match k {
        AccountKind::Checking => "checking",
        AccountKind::Savings => "savings",
    }
}

fn row_to_account(row: AccountRow, id: Uuid) -> Result<Account, DbError> {
    let customer_id = Uuid::parse_str(&row.customer_id)
        .map_err(|e| DbError::Decode(format!("invalid customer UUID: {e}")))?;
    Ok(Account {
        id,
        customer_id,
        kind: parse_kind(&row.kind)?,
        branch: row.branch,
        number: row.number,
        bank_id: row.bank_id,
        balance: row.balance,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Decode(format!("invalid customer UUID: {e}")))?;
        Ok(Account {
            id,
            customer_id,
            kind: parse_kind(&self.kind)?,
            branch: self.branch,
            number: self.number,
            bank_id: self.bank_id,
            balance: self.balance,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> FinshareResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 customer_id = $customer_id, \
                 kind = $kind, \
                 branch = $branch, \
                 number = $number, \
                 bank_id = $bank_id, \
                 balance = $balance",
            )
            .bind(("id", id_str.clone()))
            .bind(("customer_id", input.customer_id.to_string()))
            .bind(("kind", kind_to_str(&input.kind).to_string()))
            .bind(("branch", input.branch.trim().to_string()))
            .bind(("number", input.number.trim().to_string()))
            .bind(("bank_id", input.bank_id.trim().to_string()))
            .bind(("balance", input.initial_balance))
            .await
            .map_err(|e| DbError::from_write("account", e))?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("account", e))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row_to_account(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FinshareResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row_to_account(row, id)?)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> FinshareResult<Vec<Account>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE customer_id = $customer_id \
                 ORDER BY created_at ASC",
            )
            .bind(("customer_id", customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;

        let accounts = rows
            .into_iter()
            .map(|row| row.try_into_account())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(accounts)
    }
}
