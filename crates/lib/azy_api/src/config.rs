//! API server configuration.

/// Default request body limit (covers multipart attachments).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// Largest accepted request body, attachments included.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable             | Default        |
    /// |----------------------|----------------|
    /// | `BIND_ADDR`          | `0.0.0.0:3000` |
    /// | `AZY_MAX_BODY_BYTES` | `10485760`     |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_body_bytes: std::env::var("AZY_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}
