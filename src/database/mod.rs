pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::Store;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Translate constraint violations into domain errors; anything else stays a driver error.
    pub(crate) fn classify(err: sqlx::Error, conflict: &str, missing: &str) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());
        match code.as_deref() {
            Some("23505") => DatabaseError::Conflict(conflict.to_string()),
            Some("23503") => DatabaseError::NotFound(missing.to_string()),
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Owns the connection pool. Opened once in `main`, handed to the store, and
/// closed on shutdown.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::Config("database url is empty".to_string()));
        }
        url::Url::parse(&config.url)
            .map_err(|e| DatabaseError::Config(format!("invalid database url: {}", e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Connected to database (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
