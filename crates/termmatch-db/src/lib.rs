//! # termmatch-db
//!
//! PostgreSQL store layer for termmatch.
//!
//! This crate provides:
//! - Connection pool management
//! - Full-text retrieval over concept and synonym names
//! - Bounded ancestor-closure and active-relationship lookups
//! - The insert-only result cache table
//!
//! ## Example
//!
//! ```rust,ignore
//! use termmatch_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/termmatch").await?;
//!     let hits = db.concepts.search_concepts("asthma", None).await?;
//!     println!("{} candidates", hits.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod concepts;
pub mod pool;

// Re-export core types
pub use termmatch_core::*;

pub use cache::PgResultCacheRepository;
pub use concepts::PgConceptRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Default database URL for integration tests.
pub const DEFAULT_TEST_DATABASE_URL: &str = termmatch_core::defaults::DATABASE_URL;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Terminology reference-table queries.
    pub concepts: PgConceptRepository,
    /// Insert-only result cache.
    pub cache: PgResultCacheRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            concepts: PgConceptRepository::new(pool.clone()),
            cache: PgResultCacheRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
