use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Base URL of the Google Books volumes API.
pub const GOOGLE_BOOKS_API_BASE: &str = "https://www.googleapis.com/books/v1";

/// Tunables for the search pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period (ms) before a typed query is dispatched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Fixed result-count cap sent to the catalog API.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_results() -> u32 {
    20
}

fn default_api_base() -> String {
    GOOGLE_BOOKS_API_BASE.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: default_debounce_ms(),
            max_results: default_max_results(),
            api_base: default_api_base(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Defaults with any `TOME_*` environment overrides applied.
    ///
    /// Invalid numeric values are logged and ignored rather than failing
    /// startup.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`SearchConfig::from_env`] with an explicit variable lookup,
    /// so callers and tests can inject values without touching the
    /// process-wide environment.
    pub fn from_env_with(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = get("TOME_DEBOUNCE_MS") {
            match raw.parse() {
                Ok(ms) => config.debounce_ms = ms,
                Err(_) => warn!("Ignoring invalid TOME_DEBOUNCE_MS: {}", raw),
            }
        }
        if let Some(raw) = get("TOME_MAX_RESULTS") {
            match raw.parse() {
                Ok(n) => config.max_results = n,
                Err(_) => warn!("Ignoring invalid TOME_MAX_RESULTS: {}", raw),
            }
        }
        if let Some(base) = get("TOME_API_BASE") {
            config.api_base = base;
        }
        config
    }
}
