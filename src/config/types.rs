use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub index: IndexConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Connection and write policy for the search/indexing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the index service, e.g. `https://search.example.com:443`.
    pub endpoint: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Prefix of the daily index names.
    #[serde(default = "default_index_prefix")]
    pub prefix: String,

    #[serde(default = "default_write_mode")]
    pub write_mode: WriteMode,

    /// Per-request timeout for store calls, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_index_prefix() -> String {
    "stac_updater_logs_".to_string()
}

fn default_write_mode() -> WriteMode {
    WriteMode::Safe
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Document write policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Create-only insert; merge into the stored document on conflict.
    /// The only mode offering cross-batch convergence.
    Safe,
    /// Plain upsert replacing whatever is stored.
    Overwrite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub errors: ErrorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorConfig {
    #[serde(default = "default_parse_error_strategy")]
    pub on_parse_error: ParseErrorStrategy,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            on_parse_error: default_parse_error_strategy(),
        }
    }
}

fn default_parse_error_strategy() -> ParseErrorStrategy {
    ParseErrorStrategy::Abort
}

/// What to do when one log line fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorStrategy {
    /// Reject the whole batch (the source system's observed behavior).
    Abort,
    /// Drop the record, log a warning, and continue with the rest.
    Skip,
}
