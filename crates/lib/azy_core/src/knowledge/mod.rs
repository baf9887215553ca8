//! Knowledge store — pre-authored replies keyed by trigger phrases.
//!
//! A trigger matches when it contains the message, case-insensitively.
//! Two backends are provided:
//!
//! - [`rest::RestKnowledgeStore`]: PostgREST over HTTP (Supabase style)
//! - [`postgres::PgKnowledgeStore`]: direct Postgres via `sqlx`

pub mod postgres;
pub mod rest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{ConfigError, KnowledgeStoreConfig};

/// Errors from a knowledge-store lookup.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Knowledge store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Knowledge store database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Knowledge store error: {0}")]
    Backend(String),
}

/// A canned reply found for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeHit {
    pub reply: String,
}

/// Keyed lookup of canned replies.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Zero or one reply whose trigger contains `message`.
    async fn lookup(&self, message: &str) -> Result<Option<KnowledgeHit>, KnowledgeError>;

    /// Up to `limit` replies whose trigger contains any word of `message`.
    async fn related(&self, message: &str, limit: usize) -> Result<Vec<String>, KnowledgeError>;

    /// Backend identifier for logging.
    fn name(&self) -> &str;
}

/// Build the configured backend.
///
/// The Postgres pool connects lazily, so an unreachable database shows up
/// as a lookup error at request time rather than a startup failure.
/// `timeout` bounds each Postgres query; the REST store inherits the
/// client's own timeout.
pub fn connect(
    config: &KnowledgeStoreConfig,
    client: Client,
    timeout: Duration,
) -> Result<Arc<dyn KnowledgeStore>, ConfigError> {
    match config {
        KnowledgeStoreConfig::Rest {
            url,
            api_key,
            table,
        } => Ok(Arc::new(rest::RestKnowledgeStore::new(
            client,
            url.clone(),
            api_key.clone(),
            table.clone(),
        ))),
        KnowledgeStoreConfig::Postgres { url, table } => {
            let store = postgres::PgKnowledgeStore::connect_lazy(url, table, timeout)?;
            Ok(Arc::new(store))
        }
    }
}

/// Words worth matching on: alphanumeric runs of three or more characters.
pub(crate) fn context_words(message: &str) -> Vec<String> {
    const MAX_WORDS: usize = 5;
    let mut words: Vec<String> = Vec::new();
    for word in message.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() < 3 {
            continue;
        }
        let word = word.to_lowercase();
        if !words.contains(&word) {
            words.push(word);
        }
        if words.len() == MAX_WORDS {
            break;
        }
    }
    words
}
