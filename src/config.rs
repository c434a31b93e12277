use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.mcsrranked.com";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 5;

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub fetch_concurrency: usize,
    pub rust_log: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            rust_log: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `MCSR_API_BASE` (default: https://api.mcsrranked.com)
    /// - `MCSR_API_KEY` (optional, sent as `x-api-key`)
    /// - `DETAIL_CACHE_TTL_SECS` (default: 300)
    /// - `DETAIL_FETCH_CONCURRENCY` (default: 5)
    /// - `RUST_LOG` (optional)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Unparseable numbers and blank strings fall back to defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_base: text("MCSR_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),

            api_key: text("MCSR_API_KEY"),

            cache_ttl_secs: text("DETAIL_CACHE_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),

            fetch_concurrency: text("DETAIL_FETCH_CONCURRENCY")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_FETCH_CONCURRENCY),

            rust_log: text("RUST_LOG"),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Default `env_logger` filter: `RUST_LOG` when set, else `info`
    pub fn log_filter(&self) -> &str {
        self.rust_log.as_deref().unwrap_or("info")
    }
}
