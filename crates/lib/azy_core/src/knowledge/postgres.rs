//! Postgres knowledge store.
//!
//! Reads the same `trigger`/`reply` table the REST store does, straight
//! through a `sqlx` pool. The table name is validated by
//! [`PipelineConfig::validate`](crate::config::PipelineConfig::validate)
//! before it is spliced into SQL. Every query, connection checkout
//! included, runs under the outbound timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{KnowledgeError, KnowledgeHit, KnowledgeStore, context_words};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PgKnowledgeStore {
    pool: PgPool,
    lookup_sql: String,
    related_sql: String,
    query_timeout: Duration,
}

impl PgKnowledgeStore {
    pub fn new(pool: PgPool, table: &str, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
            lookup_sql: format!(
                "SELECT reply FROM {table} \
                 WHERE \"trigger\" ILIKE '%' || $1 || '%' AND reply <> '' \
                 LIMIT 1"
            ),
            related_sql: format!(
                "SELECT reply FROM {table} \
                 WHERE \"trigger\" ILIKE ANY($1) AND reply <> '' \
                 LIMIT $2"
            ),
        }
    }

    /// Pool that opens connections on first use.
    pub fn connect_lazy(
        url: &str,
        table: &str,
        query_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT.min(query_timeout))
            .connect_lazy(url)?;
        Ok(Self::new(pool, table, query_timeout))
    }
}

/// Runs `query`, turning an elapsed deadline into a backend error.
async fn bounded<T, F>(deadline: Duration, query: F) -> Result<T, KnowledgeError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, query).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(KnowledgeError::Backend(format!(
            "query timed out after {}s",
            deadline.as_secs_f32()
        ))),
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn lookup(&self, message: &str) -> Result<Option<KnowledgeHit>, KnowledgeError> {
        let query = sqlx::query_scalar(&self.lookup_sql)
            .bind(message)
            .fetch_optional(&self.pool);
        let reply: Option<String> = bounded(self.query_timeout, query).await?;
        Ok(reply.map(|reply| KnowledgeHit { reply }))
    }

    async fn related(&self, message: &str, limit: usize) -> Result<Vec<String>, KnowledgeError> {
        let patterns: Vec<String> = context_words(message)
            .into_iter()
            .map(|w| format!("%{w}%"))
            .collect();
        if patterns.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let query = sqlx::query_scalar(&self.related_sql)
            .bind(patterns)
            .bind(limit)
            .fetch_all(&self.pool);
        bounded(self.query_timeout, query).await
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
