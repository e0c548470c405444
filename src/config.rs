//! Store connection configuration

/// Connection settings for the hosted backend store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted backend
    pub base_url: String,
    /// API key, sent both as `apikey` header and bearer token
    pub api_key: String,
    pub request_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout_ms: 30_000,
        }
    }

    /// Read configuration from the environment. Loading a `.env` file
    /// is the embedding application's responsibility.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POS_STORE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            api_key: std::env::var("POS_STORE_KEY").unwrap_or_default(),
            request_timeout_ms: std::env::var("POS_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
        }
    }
}
