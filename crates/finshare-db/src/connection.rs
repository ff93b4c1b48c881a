//! SurrealDB connection management.
//!
//! Connection settings come from `FINSHARE_DB_*` environment
//! variables, falling back to a local development instance. The
//! password never appears in `Debug` output or logs.

use std::env;
use std::fmt;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Configuration for connecting to SurrealDB.
#[derive(Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "finshare".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DbConfig {
    /// Build a configuration from `FINSHARE_DB_*` environment
    /// variables. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("FINSHARE_DB_URL").unwrap_or(defaults.url),
            namespace: lookup("FINSHARE_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: lookup("FINSHARE_DB_DATABASE").unwrap_or(defaults.database),
            username: lookup("FINSHARE_DB_USERNAME").unwrap_or(defaults.username),
            password: lookup("FINSHARE_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root, selects the configured namespace and
    /// database, and probes server health before handing out the
    /// client.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        db.health().await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DbConfig::from_lookup(|_| None);
        let defaults = DbConfig::default();
        assert_eq!(config.url, defaults.url);
        assert_eq!(config.namespace, defaults.namespace);
        assert_eq!(config.database, defaults.database);
        assert_eq!(config.username, defaults.username);
        assert_eq!(config.password, defaults.password);
    }

    #[test]
    fn set_variables_override_individual_fields() {
        let config = DbConfig::from_lookup(|name| match name {
            "FINSHARE_DB_URL" => Some("db.internal:8000".into()),
            "FINSHARE_DB_PASSWORD" => Some("s3cret".into()),
            _ => None,
        });
        assert_eq!(config.url, "db.internal:8000");
        assert_eq!(config.password, "s3cret");
        // Untouched fields keep their defaults.
        assert_eq!(config.namespace, "finshare");
        assert_eq!(config.database, "main");
        assert_eq!(config.username, "root");
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let config = DbConfig {
            password: "s3cret".into(),
            ..DbConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
