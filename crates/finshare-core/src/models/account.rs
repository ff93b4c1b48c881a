//! Account domain model.
//!
//! Whether an account's data is shareable is a function of an
//! authorized, unexpired consent — there is no per-account sharing
//! flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub kind: AccountKind,
    pub branch: String,
    /// Account number. (branch, number) is unique.
    pub number: String,
    pub bank_id: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub customer_id: Uuid,
    pub kind: AccountKind,
    pub branch: String,
    pub number: String,
    pub bank_id: String,
    pub initial_balance: f64,
}
