//! Search configuration
//!
//! Read from environment variables. `from_lookup` takes any key → value
//! function so tests don't have to mutate the process environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::deepseek_client::{DEFAULT_API_URL, DEFAULT_MODEL};

pub const DEFAULT_AI_TIMEOUT_MS: u64 = 1500;
pub const DEFAULT_CATALOG_PATH: &str = "data/features/all_features.json";
pub const DEFAULT_LEGACY_LIMIT: usize = 10;
pub const DEFAULT_LEGACY_SCAN_MULTIPLIER: usize = 3;
pub const DEFAULT_RELATED_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// AI_SEARCH_ENABLE
    pub ai_enabled: bool,
    /// DEEPSEEK_API_KEY
    pub api_key: Option<String>,
    /// DEEPSEEK_MODEL
    pub model: String,
    /// DEEPSEEK_API_URL
    pub api_url: String,
    /// AI_SEARCH_TIMEOUT_MS
    pub ai_timeout: Duration,
    /// FEATURE_CATALOG_PATH
    pub catalog_path: PathBuf,
    /// Maximum records the legacy scan returns
    pub legacy_limit: usize,
    /// Legacy scan stops after `legacy_limit * legacy_scan_multiplier` hits
    pub legacy_scan_multiplier: usize,
    /// Cap on `related_features` in a found response
    pub related_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ai_enabled: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            ai_timeout: Duration::from_millis(DEFAULT_AI_TIMEOUT_MS),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            legacy_limit: DEFAULT_LEGACY_LIMIT,
            legacy_scan_multiplier: DEFAULT_LEGACY_SCAN_MULTIPLIER,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ai_enabled = lookup("AI_SEARCH_ENABLE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let ai_timeout = match lookup("AI_SEARCH_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("AI_SEARCH_TIMEOUT_MS must be an integer, got '{}'", raw))?;
                Duration::from_millis(ms)
            }
            None => defaults.ai_timeout,
        };

        Ok(Self {
            ai_enabled,
            api_key: lookup("DEEPSEEK_API_KEY").filter(|k| !k.trim().is_empty()),
            model: lookup("DEEPSEEK_MODEL").unwrap_or(defaults.model),
            api_url: lookup("DEEPSEEK_API_URL").unwrap_or(defaults.api_url),
            ai_timeout,
            catalog_path: lookup("FEATURE_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            ..defaults
        })
    }

    /// AI resolution needs both the switch and a credential
    pub fn is_ai_available(&self) -> bool {
        self.ai_enabled && self.api_key.is_some()
    }
}
