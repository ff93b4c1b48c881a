//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Consent lookups that act on
//! behalf of a customer take a `customer_id` parameter: a consent that
//! exists but belongs to another customer is indistinguishable from an
//! absent one (`NotFound`), which is the ownership boundary that
//! prevents cross-customer enumeration.

use uuid::Uuid;

use crate::error::FinshareResult;
use crate::models::{
    account::{Account, CreateAccount},
    consent::{Consent, ConsentStatus, CreateConsent},
    customer::{CreateCustomer, Customer},
    transaction::{CreateTransaction, Transaction, TransactionFilter},
};

pub trait CustomerRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the cpf or email is taken.
    fn create(&self, input: CreateCustomer) -> impl Future<Output = FinshareResult<Customer>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FinshareResult<Customer>> + Send;
    fn list(&self) -> impl Future<Output = FinshareResult<Vec<Customer>>> + Send;
}

pub trait AccountRepository: Send + Sync {
    /// Fails with `AlreadyExists` when (branch, number) is taken.
    fn create(&self, input: CreateAccount) -> impl Future<Output = FinshareResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FinshareResult<Account>> + Send;
    fn list_by_customer(
        &self,
        customer_id: Uuid,
    ) -> impl Future<Output = FinshareResult<Vec<Account>>> + Send;
}

pub trait TransactionRepository: Send + Sync {
    /// Post a transaction against its account, adjusting the balance.
    /// A debit exceeding the current balance fails with `Validation`.
    fn create(
        &self,
        input: CreateTransaction,
    ) -> impl Future<Output = FinshareResult<Transaction>> + Send;
    fn list_by_account(
        &self,
        account_id: Uuid,
        filter: TransactionFilter,
    ) -> impl Future<Output = FinshareResult<Vec<Transaction>>> + Send;
}

pub trait ConsentRepository: Send + Sync {
    /// Insert a new consent record.
    ///
    /// Fails with `AlreadyExists` when `credential_hash` is already
    /// present — the unique index is enforced by the storage engine,
    /// never by a check-then-insert in application code.
    fn create(&self, input: CreateConsent) -> impl Future<Output = FinshareResult<Consent>> + Send;

    /// Owner-scoped fetch. `NotFound` covers both absent consents and
    /// consents owned by a different customer.
    fn get_by_id(
        &self,
        customer_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = FinshareResult<Consent>> + Send;

    /// Credential resolution for the access decision path.
    fn get_by_credential_hash(
        &self,
        credential_hash: &str,
    ) -> impl Future<Output = FinshareResult<Consent>> + Send;

    fn list_by_customer(
        &self,
        customer_id: Uuid,
    ) -> impl Future<Output = FinshareResult<Vec<Consent>>> + Send;

    /// Persist a status mutation and bump `updated_at`. Consents are
    /// never hard-deleted; revoked and expired records remain as an
    /// audit trail.
    fn set_status(
        &self,
        id: Uuid,
        status: ConsentStatus,
    ) -> impl Future<Output = FinshareResult<Consent>> + Send;
}
