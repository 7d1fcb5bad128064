//! Configuration types for dune-batch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Dune API key
pub const API_KEY_VAR: &str = "DUNE_API_KEY";

/// Environment variable overriding the Dune API base URL (tests, proxies)
pub const BASE_URL_VAR: &str = "DUNE_API_BASE_URL";

/// Dune API connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key sent as the `X-Dune-API-Key` header
    pub api_key: String,

    /// Base URL of the Dune API (default: "https://api.dune.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

/// Batched fetch pacing configuration
///
/// Groups exist purely for rate-limit pacing: the fetcher processes `group_size`
/// queries back to back, then sleeps `pause_between_groups` before the next
/// group. No pause follows the final group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of queries fetched between pauses (default: 3)
    #[serde(default = "default_group_size")]
    pub group_size: usize,

    /// Pause inserted between groups (default: 30 seconds)
    #[serde(default = "default_pause", with = "duration_serde")]
    pub pause_between_groups: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            pause_between_groups: default_pause(),
        }
    }
}

/// Column-extraction configuration
///
/// The defaults match the one known output shape (token addresses in the third
/// column, with a possible literal header row); both knobs are configurable
/// rather than hard-coded constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Zero-based index of the column to extract (default: 2)
    #[serde(default = "default_column_index")]
    pub column_index: usize,

    /// Header value to drop when encountered, compared lowercase
    /// (default: "token_address")
    #[serde(default = "default_header_sentinel")]
    pub header_sentinel: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            column_index: default_column_index(),
            header_sentinel: default_header_sentinel(),
        }
    }
}

/// Main configuration for dune-batch
///
/// Built once at startup (see [`Config::from_env`]) and passed explicitly into
/// the fetcher and extractor — the core logic never reads the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Dune API connection settings
    pub api: ApiConfig,

    /// Batched fetch pacing
    #[serde(default)]
    pub batch: BatchConfig,

    /// Column extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Directory for fetched CSV output (default: "dune_output")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory for parsed address lists (default: "dune_parsed")
    #[serde(default = "default_parsed_dir")]
    pub parsed_dir: PathBuf,
}

impl Config {
    /// Build a configuration with defaults for everything but the API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                api_key: api_key.into(),
                base_url: default_base_url(),
                request_timeout: default_request_timeout(),
            },
            batch: BatchConfig::default(),
            extract: ExtractConfig::default(),
            output_dir: default_output_dir(),
            parsed_dir: default_parsed_dir(),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// `DUNE_API_KEY` is required; `DUNE_API_BASE_URL` optionally overrides
    /// the API endpoint. The caller is expected to have loaded `.env` first
    /// (the binary does this via `dotenvy`).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: format!("{API_KEY_VAR} not found in environment or .env file"),
                key: Some(API_KEY_VAR.to_string()),
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_VAR)
            && !base_url.trim().is_empty()
        {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }
}

fn default_base_url() -> String {
    "https://api.dune.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_group_size() -> usize {
    3
}

fn default_pause() -> Duration {
    Duration::from_secs(30)
}

fn default_column_index() -> usize {
    2
}

fn default_header_sentinel() -> String {
    "token_address".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dune_output")
}

fn default_parsed_dir() -> PathBuf {
    PathBuf::from("dune_parsed")
}

// Duration serialization helper (seconds as u64)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
