//! Database migration support.
//!
//! Embeds and runs SQL migrations from `azy_core/migrations/`. Only the
//! Postgres knowledge store needs them; the REST store's table is managed
//! by whoever hosts it.

use sqlx::PgPool;

use crate::config::{DEFAULT_KNOWLEDGE_TABLE, KnowledgeStoreConfig};

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Whether the embedded migrations create the table `store` reads.
///
/// They only create the default table; a Postgres store pointed at any
/// other table needs it created by hand.
pub fn creates_table_for(store: &KnowledgeStoreConfig) -> bool {
    matches!(store, KnowledgeStoreConfig::Postgres { .. })
        && store.table() == DEFAULT_KNOWLEDGE_TABLE
}
