//! SeaORM-based database access
//!
//! The cache lives in a single SQLite table. `Database` owns the connection
//! pool and is cloned into whatever needs it; connections are checked out per
//! query and returned immediately.

use anyhow::{Context, Result};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{ConnectOptions, Database as SeaOrmDatabase, DatabaseConnection, SqlxSqliteConnector};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

pub mod migrations;
pub mod repositories;

const MEMORY_URL: &str = "sqlite::memory:";

/// Database connection manager
#[derive(Clone)]
pub struct Database {
    pub connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Create a new database connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        Self::ensure_supported_url(&config.url)?;

        let connection = if Self::is_memory_url(&config.url) {
            info!("Using in-memory SQLite database; cached VINs are lost on exit");
            Self::connect_in_memory(&config.url).await?
        } else {
            let url = Self::ensure_sqlite_auto_creation(&config.url)?;
            let mut options = ConnectOptions::new(&url);
            options
                .max_connections(config.max_connections.unwrap_or(10))
                .min_connections(1)
                .connect_timeout(config.connect_timeout_duration()?)
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .sqlx_logging_level(tracing::log::LevelFilter::Debug);
            SeaOrmDatabase::connect(options)
                .await
                .with_context(|| format!("Failed to connect to database at '{}'", config.url))?
        };

        debug!("Database connection established");
        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    /// Fresh, migrated in-memory database
    pub async fn new_in_memory() -> Result<Self> {
        let database = Self {
            connection: Arc::new(Self::connect_in_memory(MEMORY_URL).await?),
        };
        database.migrate().await?;
        Ok(database)
    }

    /// An in-memory SQLite database lives exactly as long as its connection,
    /// so the pool holds one connection that is never reaped or recycled.
    async fn connect_in_memory(url: &str) -> Result<DatabaseConnection> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid SQLite URL: {}", url))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;
        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }

    fn ensure_supported_url(url: &str) -> Result<()> {
        if url.starts_with("sqlite:") {
            Ok(())
        } else {
            anyhow::bail!("Unsupported database URL format (only sqlite is supported): {}", url);
        }
    }

    /// Create the parent directory of a missing database file and ask SQLite
    /// to create the file itself (`mode=rwc`)
    fn ensure_sqlite_auto_creation(url: &str) -> Result<String> {
        if url.contains("mode=") {
            return Ok(url.to_string());
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .and_then(|rest| rest.split('?').next())
            .map(Path::new)
            .with_context(|| format!("Invalid SQLite URL format: {}", url))?;
        if path.exists() {
            return Ok(url.to_string());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }

        let separator = if url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}mode=rwc", url, separator))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        use migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(&*self.connection, None)
            .await
            .context("Failed to run migrations")?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database connection
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.connection.clone()
    }

    /// Check that a connection can be acquired and used
    pub async fn ping(&self) -> bool {
        match self.connection.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_sqlite_url_is_rejected() {
        assert!(Database::ensure_supported_url("postgres://localhost/vins").is_err());
        assert!(Database::ensure_supported_url("sqlite://./vins.db").is_ok());
    }

    #[test]
    fn test_sqlite_auto_creation_appends_mode() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("vins.db");
        let url = format!("sqlite://{}", db_path.display());

        let modified = Database::ensure_sqlite_auto_creation(&url).unwrap();

        assert_eq!(modified, format!("{}?mode=rwc", url));
        assert!(db_path.parent().unwrap().exists());
    }

    #[test]
    fn test_existing_mode_is_kept() {
        let url = "sqlite://./vins.db?mode=ro";
        assert_eq!(Database::ensure_sqlite_auto_creation(url).unwrap(), url);
    }

    #[tokio::test]
    async fn test_memory_url_keeps_single_unreaped_connection() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(8),
            connect_timeout: "5s".to_string(),
        };

        let database = Database::new(&config).await.unwrap();
        database.migrate().await.unwrap();

        let pool = database.connection.get_sqlite_connection_pool().options();
        assert_eq!(pool.get_max_connections(), 1);
        assert_eq!(pool.get_idle_timeout(), None);
        assert_eq!(pool.get_max_lifetime(), None);

        // The migrated table is visible to later queries
        let repository = repositories::VinSeaOrmRepository::new(database.connection());
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_database_connects_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("vins.db").display()),
            max_connections: Some(2),
            connect_timeout: "5s".to_string(),
        };

        let database = Database::new(&config).await.unwrap();
        database.migrate().await.unwrap();
        // Migrations are idempotent
        database.migrate().await.unwrap();

        assert!(database.ping().await);
        assert!(dir.path().join("vins.db").exists());
    }
}
