//! Integration tests for account and transaction repositories.

use chrono::NaiveDate;
use finshare_core::error::FinshareError;
use finshare_core::models::account::{AccountKind, CreateAccount};
use finshare_core::models::customer::CreateCustomer;
use finshare_core::models::transaction::{CreateTransaction, TransactionFilter, TransactionKind};
use finshare_core::repository::{AccountRepository, CustomerRepository, TransactionRepository};
use finshare_db::repository::{
    SurrealAccountRepository, SurrealCustomerRepository, SurrealTransactionRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;

async fn setup() -> (
    SurrealAccountRepository<MemDb>,
    SurrealTransactionRepository<MemDb>,
    Uuid, // customer_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    finshare_db::run_migrations(&db).await.unwrap();

    let customer_repo = SurrealCustomerRepository::new(db.clone());
    let customer = customer_repo
        .create(CreateCustomer {
            name: "Diego Ramos".into(),
            cpf: "93541134780".into(),
            email: "diego@example.com".into(),
        })
        .await
        .unwrap();

    (
        SurrealAccountRepository::new(db.clone()),
        SurrealTransactionRepository::new(db),
        customer.id,
    )
}

fn account_input(customer_id: Uuid, branch: &str, number: &str) -> CreateAccount {
    CreateAccount {
        customer_id,
        kind: AccountKind::Checking,
        branch: branch.into(),
        number: number.into(),
        bank_id: "001".into(),
        initial_balance: 100.0,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn duplicate_branch_number_is_a_conflict() {
    let (accounts, _txns, customer_id) = setup().await;

    accounts
        .create(account_input(customer_id, "0001", "12345-6"))
        .await
        .unwrap();

    let err = accounts
        .create(account_input(customer_id, "0001", "12345-6"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinshareError::AlreadyExists { .. }));
}

#[tokio::test]
async fn posting_adjusts_balance_and_rejects_overdraft() {
    let (accounts, txns, customer_id) = setup().await;

    let account = accounts
        .create(account_input(customer_id, "0002", "22222-2"))
        .await
        .unwrap();
    assert_eq!(account.balance, 100.0);

    txns.create(CreateTransaction {
        account_id: account.id,
        date: date("2026-08-01"),
        description: "salary".into(),
        amount: 50.0,
        kind: TransactionKind::Credit,
        category: None,
    })
    .await
    .unwrap();

    txns.create(CreateTransaction {
        account_id: account.id,
        date: date("2026-08-02"),
        description: "groceries".into(),
        amount: 30.0,
        kind: TransactionKind::Debit,
        category: Some("Food".into()),
    })
    .await
    .unwrap();

    let account = accounts.get_by_id(account.id).await.unwrap();
    assert_eq!(account.balance, 120.0);

    let overdraft = txns
        .create(CreateTransaction {
            account_id: account.id,
            date: date("2026-08-03"),
            description: "car".into(),
            amount: 10_000.0,
            kind: TransactionKind::Debit,
            category: None,
        })
        .await;
    assert!(matches!(overdraft, Err(FinshareError::Validation { .. })));

    // Balance untouched by the rejected debit.
    let account = accounts.get_by_id(account.id).await.unwrap();
    assert_eq!(account.balance, 120.0);
}

#[tokio::test]
async fn rejected_posting_leaves_no_partial_state() {
    let (accounts, txns, customer_id) = setup().await;

    let account = accounts
        .create(account_input(customer_id, "0006", "66666-6"))
        .await
        .unwrap();

    txns.create(CreateTransaction {
        account_id: account.id,
        date: date("2026-08-01"),
        description: "deposit".into(),
        amount: 40.0,
        kind: TransactionKind::Credit,
        category: None,
    })
    .await
    .unwrap();

    let overdraft = txns
        .create(CreateTransaction {
            account_id: account.id,
            date: date("2026-08-02"),
            description: "too big".into(),
            amount: 500.0,
            kind: TransactionKind::Debit,
            category: None,
        })
        .await;
    assert!(matches!(overdraft, Err(FinshareError::Validation { .. })));

    // The rejected debit posted neither a ledger row nor a balance
    // change: the ledger still adds up to the stored balance.
    let ledger = txns
        .list_by_account(account.id, TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].description, "deposit");

    let account = accounts.get_by_id(account.id).await.unwrap();
    assert_eq!(account.balance, 140.0);
}

#[tokio::test]
async fn posting_to_unknown_account_is_not_found() {
    let (_accounts, txns, _customer_id) = setup().await;

    let err = txns
        .create(CreateTransaction {
            account_id: Uuid::new_v4(),
            date: date("2026-08-01"),
            description: "ghost".into(),
            amount: 1.0,
            kind: TransactionKind::Credit,
            category: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FinshareError::NotFound { .. }));
}

#[tokio::test]
async fn date_range_filter_is_inclusive() {
    let (accounts, txns, customer_id) = setup().await;

    let account = accounts
        .create(account_input(customer_id, "0003", "33333-3"))
        .await
        .unwrap();

    for (d, desc) in [
        ("2026-01-10", "jan"),
        ("2026-02-10", "feb"),
        ("2026-03-10", "mar"),
    ] {
        txns.create(CreateTransaction {
            account_id: account.id,
            date: date(d),
            description: desc.into(),
            amount: 1.0,
            kind: TransactionKind::Credit,
            category: None,
        })
        .await
        .unwrap();
    }

    let all = txns
        .list_by_account(account.id, TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    // Ordered by booking date.
    assert_eq!(all[0].description, "jan");
    assert_eq!(all[2].description, "mar");

    let window = txns
        .list_by_account(
            account.id,
            TransactionFilter {
                from: Some(date("2026-02-10")),
                to: Some(date("2026-02-28")),
            },
        )
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].description, "feb");
}

#[tokio::test]
async fn accounts_are_listed_per_customer() {
    let (accounts, _txns, customer_id) = setup().await;

    accounts
        .create(account_input(customer_id, "0004", "44444-4"))
        .await
        .unwrap();
    accounts
        .create(account_input(customer_id, "0005", "55555-5"))
        .await
        .unwrap();

    let mine = accounts.list_by_customer(customer_id).await.unwrap();
    assert_eq!(mine.len(), 2);

    let none = accounts.list_by_customer(Uuid::new_v4()).await.unwrap();
    assert!(none.is_empty());
}
