//! Integration tests for the consent repository against an in-memory
//! SurrealDB.

use chrono::{Duration, Utc};
use finshare_core::error::FinshareError;
use finshare_core::models::consent::{ConsentStatus, CreateConsent, Permission};
use finshare_core::models::customer::CreateCustomer;
use finshare_core::repository::{ConsentRepository, CustomerRepository};
use finshare_db::repository::{SurrealConsentRepository, SurrealCustomerRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type MemDb = surrealdb::engine::local::Db;

async fn setup() -> (SurrealConsentRepository<MemDb>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    finshare_db::run_migrations(&db).await.unwrap();

    let customer_repo = SurrealCustomerRepository::new(db.clone());
    let customer = customer_repo
        .create(CreateCustomer {
            name: "Carla Mendes".into(),
            cpf: "11144477735".into(),
            email: "carla@example.com".into(),
        })
        .await
        .unwrap();

    (SurrealConsentRepository::new(db), customer.id)
}

fn create_input(customer_id: Uuid, credential_hash: &str) -> CreateConsent {
    CreateConsent {
        customer_id,
        status: ConsentStatus::Authorized,
        permissions: vec![Permission::AccountsRead, Permission::BalancesRead],
        expires_at: Utc::now() + Duration::days(365),
        credential_hash: credential_hash.into(),
    }
}

#[tokio::test]
async fn create_and_fetch_roundtrip() {
    let (repo, customer_id) = setup().await;

    let created = repo
        .create(create_input(customer_id, "hash-roundtrip"))
        .await
        .unwrap();
    assert_eq!(created.customer_id, customer_id);
    assert_eq!(created.status, ConsentStatus::Authorized);
    assert_eq!(
        created.permissions,
        vec![Permission::AccountsRead, Permission::BalancesRead]
    );

    let by_id = repo.get_by_id(customer_id, created.id).await.unwrap();
    assert_eq!(by_id.credential_hash, "hash-roundtrip");

    let by_hash = repo.get_by_credential_hash("hash-roundtrip").await.unwrap();
    assert_eq!(by_hash.id, created.id);
}

#[tokio::test]
async fn duplicate_credential_hash_is_a_conflict() {
    let (repo, customer_id) = setup().await;

    repo.create(create_input(customer_id, "hash-dup"))
        .await
        .unwrap();

    let err = repo
        .create(create_input(customer_id, "hash-dup"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FinshareError::AlreadyExists { ref entity } if entity == "consent"),
        "expected AlreadyExists, got {err:?}"
    );

    // The original record survives untouched.
    let survivor = repo.get_by_credential_hash("hash-dup").await.unwrap();
    assert_eq!(survivor.status, ConsentStatus::Authorized);
}

#[tokio::test]
async fn ownership_scoping_hides_foreign_consents() {
    let (repo, customer_id) = setup().await;

    let created = repo
        .create(create_input(customer_id, "hash-owned"))
        .await
        .unwrap();

    let err = repo.get_by_id(Uuid::new_v4(), created.id).await.unwrap_err();
    assert!(matches!(err, FinshareError::NotFound { .. }));
}

#[tokio::test]
async fn unknown_hash_is_not_found() {
    let (repo, _customer_id) = setup().await;

    let err = repo.get_by_credential_hash("no-such-hash").await.unwrap_err();
    assert!(matches!(err, FinshareError::NotFound { .. }));
}

#[tokio::test]
async fn set_status_persists_and_bumps_updated_at() {
    let (repo, customer_id) = setup().await;

    let created = repo
        .create(create_input(customer_id, "hash-status"))
        .await
        .unwrap();

    let revoked = repo
        .set_status(created.id, ConsentStatus::Revoked)
        .await
        .unwrap();
    assert_eq!(revoked.status, ConsentStatus::Revoked);
    assert!(revoked.updated_at >= created.updated_at);

    // The record is retained, not deleted — audit trail.
    let stored = repo.get_by_id(customer_id, created.id).await.unwrap();
    assert_eq!(stored.status, ConsentStatus::Revoked);
}

#[tokio::test]
async fn list_by_customer_only_returns_own_consents() {
    let (repo, customer_id) = setup().await;

    repo.create(create_input(customer_id, "hash-list-1"))
        .await
        .unwrap();
    repo.create(create_input(customer_id, "hash-list-2"))
        .await
        .unwrap();

    let consents = repo.list_by_customer(customer_id).await.unwrap();
    assert_eq!(consents.len(), 2);

    let none = repo.list_by_customer(Uuid::new_v4()).await.unwrap();
    assert!(none.is_empty());
}
