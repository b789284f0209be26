//! Database connection and operations
//!
//! Movies and directors are stored as flat documents, one table per kind.
//! Resolvers reach the store only through the [Database] handle injected into
//! the GraphQL schema.

pub mod directors;
pub mod movies;
pub mod schema_sync;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use directors::{CreateDirector, DirectorRecord, DirectorRepository, UpdateDirector};
pub use movies::{CreateMovie, MovieRecord, MovieRepository, UpdateMovie};
pub use schema_sync::{DocumentSchema, SchemaSyncResult};

/// Default pool size when `DATABASE_MAX_CONNECTIONS` is unset
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Database wrapper providing connection pool access
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?;
        Ok(options)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(Self::connect_options(url)?)
            .await
            .with_context(|| format!("Failed to connect to database at {}", url))?;

        Ok(Self { pool })
    }

    /// Create a pool that opens connections on first use.
    ///
    /// Requests made while the database is unreachable fail with store errors
    /// instead of taking the service down. Every connection the pool opens
    /// syncs the schema first, so tables exist once the database is reachable.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    schema_sync::sync_all_document_schemas(conn).await.log();
                    Ok(())
                })
            })
            .connect_lazy_with(Self::connect_options(url)?);

        Ok(Self { pool })
    }

    /// Private in-memory database on a single pinned connection
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(Self::connect_options("sqlite::memory:")?)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Verify the database answers queries
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create missing tables, columns and indexes
    pub async fn sync_schema(&self) -> SchemaSyncResult {
        schema_sync::sync_pool(&self.pool).await
    }

    /// Get a directors repository
    pub fn directors(&self) -> DirectorRepository {
        DirectorRepository::new(self.pool.clone())
    }

    /// Get a movies repository
    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.pool.clone())
    }
}

/// Generate a new opaque document identifier
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
