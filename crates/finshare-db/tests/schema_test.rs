//! Migration runner behavior against an in-memory SurrealDB.

use finshare_core::models::customer::CreateCustomer;
use finshare_core::repository::CustomerRepository;
use finshare_db::repository::SurrealCustomerRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    finshare_db::run_migrations(&db).await.unwrap();
    // Second run is a no-op, not a failure.
    finshare_db::run_migrations(&db).await.unwrap();

    // The schema is usable after a double run.
    let repo = SurrealCustomerRepository::new(db);
    repo.create(CreateCustomer {
        name: "Eva Costa".into(),
        cpf: "28625587887".into(),
        email: "eva@example.com".into(),
    })
    .await
    .unwrap();
}

#[test]
fn schema_v1_defines_all_tables() {
    let ddl = finshare_db::schema_v1();
    for table in ["customer", "account", "transaction", "consent"] {
        assert!(
            ddl.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
            "missing table definition: {table}"
        );
    }
}
