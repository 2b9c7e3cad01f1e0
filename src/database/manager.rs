use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Lazily-connected shared pool for the application database
pub struct DatabaseManager {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager {
            pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the shared pool, connecting on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let manager = Self::instance();

        // Fast path: already connected
        {
            let pool = manager.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let database = &config::config().database;
        let url = database
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
            .connect(url)
            .await?;

        let mut slot = manager.pool.write().await;
        // Another task may have connected while we were; keep the first pool
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        *slot = Some(pool.clone());

        info!(
            "Connected database pool ({} max connections)",
            database.max_connections
        );
        Ok(pool)
    }

    /// Pings the database to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Apply pending migrations from ./migrations
    pub async fn migrate() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
