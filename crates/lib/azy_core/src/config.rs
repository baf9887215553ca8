//! Pipeline configuration.
//!
//! Read once at process start and immutable afterwards. Missing optional
//! settings disable the matching responder instead of failing startup.
//!
//! | Variable                    | Default                       |
//! |-----------------------------|-------------------------------|
//! | `OPENAI_API_KEY`            | unset → model responder off   |
//! | `OPENAI_MODEL`              | `gpt-4o-mini`                 |
//! | `OPENAI_BASE_URL`           | `https://api.openai.com/v1`   |
//! | `AZY_SYSTEM_PROMPT`         | Azy IA persona                |
//! | `AZY_MAX_OUTPUT_TOKENS`     | `800`                         |
//! | `AZY_TEMPERATURE`           | `0.8`                         |
//! | `AZY_MODEL_CONTEXT`         | `false`                       |
//! | `SUPABASE_URL` + `SUPABASE_ANON_KEY` | unset → no REST store |
//! | `KNOWLEDGE_DATABASE_URL`    | unset → no Postgres store     |
//! | `KNOWLEDGE_TABLE`           | `responses`                   |
//! | `AZY_BLOCKED_TERMS`         | none (comma-separated)        |
//! | `AZY_OUTBOUND_TIMEOUT_SECS` | `30`                          |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Você é Azy IA — assistente amigável, útil, educada e segura.";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_KNOWLEDGE_TABLE: &str = "responses";
pub const DEFAULT_OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while turning configuration into live clients.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generative chat-completion settings.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub system_instruction: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Prefix the prompt with related knowledge-store replies.
    pub use_store_context: bool,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("use_store_context", &self.use_store_context)
            .finish()
    }
}

/// Where canned replies live.
#[derive(Clone)]
pub enum KnowledgeStoreConfig {
    /// PostgREST endpoint (Supabase project URL + anon key).
    Rest {
        url: String,
        api_key: String,
        table: String,
    },
    /// Direct Postgres connection.
    Postgres { url: String, table: String },
}

impl KnowledgeStoreConfig {
    pub fn table(&self) -> &str {
        match self {
            KnowledgeStoreConfig::Rest { table, .. } | KnowledgeStoreConfig::Postgres { table, .. } => {
                table
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KnowledgeStoreConfig::Rest { .. } => "rest",
            KnowledgeStoreConfig::Postgres { .. } => "postgres",
        }
    }
}

impl std::fmt::Debug for KnowledgeStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeStoreConfig::Rest { url, table, .. } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("api_key", &"<redacted>")
                .field("table", table)
                .finish(),
            KnowledgeStoreConfig::Postgres { table, .. } => f
                .debug_struct("Postgres")
                .field("url", &"<redacted>")
                .field("table", table)
                .finish(),
        }
    }
}

/// Everything the pipeline needs to build its responders.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub model: Option<ModelConfig>,
    pub knowledge: Option<KnowledgeStoreConfig>,
    pub extra_blocked_terms: Vec<String>,
    pub outbound_timeout: Duration,
}

impl Default for PipelineConfig {
    /// Nothing optional enabled: policy filter plus static fallback only.
    fn default() -> Self {
        Self {
            model: None,
            knowledge: None,
            extra_blocked_terms: Vec::new(),
            outbound_timeout: DEFAULT_OUTBOUND_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = get("OPENAI_API_KEY").map(|api_key| ModelConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            system_instruction: get("AZY_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.into()),
            max_output_tokens: parse_or(
                "AZY_MAX_OUTPUT_TOKENS",
                get("AZY_MAX_OUTPUT_TOKENS"),
                DEFAULT_MAX_OUTPUT_TOKENS,
            ),
            temperature: parse_or("AZY_TEMPERATURE", get("AZY_TEMPERATURE"), DEFAULT_TEMPERATURE),
            use_store_context: get("AZY_MODEL_CONTEXT").is_some_and(|v| is_truthy(&v)),
        });

        let table = get("KNOWLEDGE_TABLE").unwrap_or_else(|| DEFAULT_KNOWLEDGE_TABLE.into());
        let rest = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(api_key)) => Some(KnowledgeStoreConfig::Rest {
                url,
                api_key,
                table: table.clone(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("SUPABASE_URL and SUPABASE_ANON_KEY must both be set; REST knowledge store disabled");
                None
            }
            (None, None) => None,
        };
        let postgres = get("KNOWLEDGE_DATABASE_URL")
            .map(|url| KnowledgeStoreConfig::Postgres { url, table });
        if rest.is_some() && postgres.is_some() {
            warn!("both REST and Postgres knowledge stores configured; using REST");
        }

        let extra_blocked_terms = get("AZY_BLOCKED_TERMS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let timeout_secs: u64 = parse_or(
            "AZY_OUTBOUND_TIMEOUT_SECS",
            get("AZY_OUTBOUND_TIMEOUT_SECS"),
            DEFAULT_OUTBOUND_TIMEOUT.as_secs(),
        );

        Self {
            model,
            knowledge: rest.or(postgres),
            extra_blocked_terms,
            outbound_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Validates table names and URLs before any client is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(knowledge) = &self.knowledge {
            let table = knowledge.table();
            let valid = !table.is_empty()
                && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "knowledge table name must be alphanumeric/underscore: {table:?}"
                )));
            }
            if let KnowledgeStoreConfig::Rest { url, .. } = knowledge {
                check_url("SUPABASE_URL", url)?;
            }
        }
        if let Some(model) = &self.model {
            check_url("OPENAI_BASE_URL", &model.base_url)?;
        }
        Ok(())
    }
}

fn check_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::Invalid(format!("{name} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "{name} must use http or https, got {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy,
{
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %v, "unparseable value; using default");
            default
        }),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
