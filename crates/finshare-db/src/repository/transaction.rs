//! SurrealDB implementation of [`TransactionRepository`].
//!
//! Posting a transaction adjusts the owning account's balance.
//! Booking dates are stored as ISO `YYYY-MM-DD` strings, so range
//! filters compare lexicographically.

use chrono::{DateTime, NaiveDate, Utc};
use finshare_core::error::{FinshareError, FinshareResult};
use finshare_core::models::transaction::{
    CreateTransaction, Transaction, TransactionFilter, TransactionKind,
};
use finshare_core::repository::TransactionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TransactionRow {
    account_id: String,
    date: String,
    description: String,
    amount: f64,
    kind: String,
    category: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TransactionRowWithId {
    record_id: String,
    account_id: String,
    date: String,
    description: String,
    amount: f64,
    kind: String,
    category: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BalanceRow {
    balance: f64,
}

fn parse_kind(s: &str) -> Result<TransactionKind, DbError> {
    match s {
        "credit" => Ok(TransactionKind::Credit),
        "debit" => Ok(TransactionKind::Debit),
        other => Err(DbError::Decode(format!(
            "unknown transaction kind: {other}"
        ))),
    }
}

fn kind_to_str(k: &TransactionKind) -> &'static str {
    match k {
        TransactionKind::Credit => "credit",
        TransactionKind::Debit => "debit",
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Decode(format!("invalid booking date: {e}")))
}

fn row_to_transaction(row: TransactionRow, id: Uuid) -> Result<Transaction, DbError> {
    let account_id = Uuid::parse_str(&row.account_id)
        .map_err(|e| DbError::Decode(format!("invalid account UUID: {e}")))?;
    Ok(Transaction {
        id,
        account_id,
        date: parse_date(&row.date)?,
        description: row.description,
        amount: row.amount,
        kind: parse_kind(&row.kind)?,
        category: row.category,
        created_at: row.created_at,
    })
}

impl TransactionRowWithId {
    fn try_into_transaction(self) -> Result<Transaction, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let account_id = Uuid::parse_str(&self.account_id)
            .map_err(|e| DbError::Decode(format!("invalid account UUID: {e}")))?;
        Ok(Transaction {
            id,
            account_id,
            date: parse_date(&self.date)?,
            description: self.description,
            amount: self.amount,
            kind: parse_kind(&self.kind)?,
            category: self.category,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Transaction repository.
#[derive(Clone)]
pub struct SurrealTransactionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTransactionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TransactionRepository for SurrealTransactionRepository<C> {
    async fn create(&self, input: CreateTransaction) -> FinshareResult<Transaction> {
        if !input.amount.is_finite() || input.amount < 0.0 {
            return Err(FinshareError::Validation {
                message: "amount must be a non-negative number".into(),
            });
        }
        if input.description.trim().is_empty() {
            return Err(FinshareError::Validation {
                message: "description is required".into(),
            });
        }

        let account_id_str = input.account_id.to_string();

        // The account must exist, and a debit may not overdraw it.
        let mut result = self
            .db
            .query("SELECT balance FROM type::record('account', $id)")
            .bind(("id", account_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let balances: Vec<BalanceRow> = result.take(0).map_err(DbError::from)?;
        let balance = balances
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "account".into(),
                id: account_id_str.clone(),
            })?
            .balance;

        let delta = match input.kind {
            TransactionKind::Credit => input.amount,
            TransactionKind::Debit => {
                if balance < input.amount {
                    return Err(FinshareError::Validation {
                        message: "insufficient balance".into(),
                    });
                }
                -input.amount
            }
        };

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let category = input.category.unwrap_or_else(|| "General".into());

        // Insert and balance adjustment commit atomically; a failure
        // in either statement rolls back both.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('transaction', $id) SET \
                 account_id = $account_id, \
                 date = $date, \
                 description = $description, \
                 amount = $amount, \
                 kind = $kind, \
                 category = $category; \
                 UPDATE type::record('account', $account_id) SET \
                 balance = balance + $delta, updated_at = time::now(); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str.clone()))
            .bind(("account_id", account_id_str))
            .bind(("date", input.date.format("%Y-%m-%d").to_string()))
            .bind(("description", input.description.trim().to_string()))
            .bind(("amount", input.amount))
            .bind(("kind", kind_to_str(&input.kind).to_string()))
            .bind(("category", category.trim().to_string()))
            .bind(("delta", delta))
            .await
            .map_err(|e| DbError::from_write("transaction", e))?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("transaction", e))?;

        // BEGIN and COMMIT each occupy a result slot, so the CREATE
        // statement's result is at index 1.
        let rows: Vec<TransactionRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "transaction".into(),
            id: id_str,
        })?;

        Ok(row_to_transaction(row, id)?)
    }

    async fn list_by_account(
        &self,
        account_id: Uuid,
        filter: TransactionFilter,
    ) -> FinshareResult<Vec<Transaction>> {
        let mut conditions = vec!["account_id = $account_id"];
        if filter.from.is_some() {
            conditions.push("date >= $from");
        }
        if filter.to.is_some() {
            conditions.push("date <= $to");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM transaction \
             WHERE {} \
             ORDER BY date ASC, created_at ASC",
            conditions.join(" AND ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("account_id", account_id.to_string()));

        if let Some(from) = filter.from {
            builder = builder.bind(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = filter.to {
            builder = builder.bind(("to", to.format("%Y-%m-%d").to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<TransactionRowWithId> = result.take(0).map_err(DbError::from)?;

        let transactions = rows
            .into_iter()
            .map(|row| row.try_into_transaction())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(transactions)
    }
}
