//! Store-backed result cache repository.
//!
//! Entries are keyed by `(search_term, params_hash)` and are insert-only:
//! two identical misses racing each other may both insert, so the lookup
//! takes the oldest row for a key rather than assuming uniqueness. There
//! is no TTL; invalidation is the administrative bulk clear after a
//! terminology refresh.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use termmatch_core::{ConceptMatch, Error, Result, ResultCacheRepository};

/// PostgreSQL implementation of the result cache.
pub struct PgResultCacheRepository {
    pool: Pool<Postgres>,
}

impl PgResultCacheRepository {
    /// Create a new PgResultCacheRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Number of cache rows currently stored (for observability/tests).
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM concept_match_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("n"))
    }
}

#[async_trait]
impl ResultCacheRepository for PgResultCacheRepository {
    async fn lookup(&self, term: &str, params_hash: &str) -> Result<Option<Vec<ConceptMatch>>> {
        let row = sqlx::query(
            r#"
            SELECT results
            FROM concept_match_cache
            WHERE search_term = $1 AND params_hash = $2
            ORDER BY created_at_utc
            LIMIT 1
            "#,
        )
        .bind(term)
        .bind(params_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            debug!(
                subsystem = "db",
                component = "result_cache",
                op = "lookup",
                search_term = term,
                cache_hit = false,
                "Cache miss"
            );
            return Ok(None);
        };

        let value: serde_json::Value = row.get("results");
        let results: Vec<ConceptMatch> =
            serde_json::from_value(value).map_err(|e| Error::Cache(e.to_string()))?;

        debug!(
            subsystem = "db",
            component = "result_cache",
            op = "lookup",
            search_term = term,
            cache_hit = true,
            result_count = results.len(),
            "Cache hit"
        );
        Ok(Some(results))
    }

    async fn store(&self, term: &str, params_hash: &str, results: &[ConceptMatch]) -> Result<()> {
        let payload = serde_json::to_value(results).map_err(|e| Error::Cache(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO concept_match_cache (search_term, params_hash, results)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(term)
        .bind(params_hash)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "result_cache",
            op = "store",
            search_term = term,
            result_count = results.len(),
            "Cache entry stored"
        );
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM concept_match_cache")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        let deleted = result.rows_affected();
        info!(
            subsystem = "db",
            component = "result_cache",
            op = "clear_all",
            rows_deleted = deleted,
            "Cleared result cache"
        );
        Ok(deleted)
    }
}
