//! FINSHARE Server — Application entry point.
//!
//! Connects to SurrealDB and brings the schema up to date. The REST
//! transport mounts the consent service and request guard from
//! `finshare-auth` on top of the repositories in `finshare-db`.

use finshare_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("finshare=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting FINSHARE server...");

    let config = DbConfig::from_env();
    let db = match DbManager::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = finshare_db::run_migrations(db.client()).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    // TODO: Start REST API server

    tracing::info!("FINSHARE server stopped.");
}
