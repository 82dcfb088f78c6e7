pub mod validation;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, path::PathBuf};

/// Main settings configuration for route-latency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level for application logging (e.g., "info", "debug", "warn", "error")
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Search backend connection
    #[serde(default)]
    pub search: SearchSettings,
    /// Which log records to pull from the index
    #[serde(default)]
    pub filter: FilterSettings,
    /// Local copy of the analyzed records
    #[serde(default)]
    pub cache: CacheSettings,
    /// Parsing and aggregation parameters
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Elasticsearch connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Base URL of the cluster, e.g. http://localhost:9200
    #[serde(default = "default_search_url")]
    pub url: String,
    /// Index (or index pattern) holding the application logs
    #[serde(default = "default_index")]
    pub index: String,
    /// Number of hits requested per scroll page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// How long the backend keeps a scroll context alive between pages
    #[serde(default = "default_scroll_keepalive")]
    pub scroll_keepalive: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Per-request timeout. When unset a hung backend call hangs the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Boolean filter applied to the log index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Field matched exactly against `ident`
    #[serde(default = "default_ident_field")]
    pub ident_field: String,
    #[serde(default = "default_ident")]
    pub ident: String,
    /// Field matched against the `host_pattern` wildcard
    #[serde(default = "default_host_field")]
    pub host_field: String,
    #[serde(default = "default_host_pattern")]
    pub host_pattern: String,
    /// Field searched for `message_match`
    #[serde(default = "default_message_field")]
    pub message_field: String,
    #[serde(default = "default_message_match")]
    pub message_match: String,
    /// Field holding the record time, bounded below by `since` (inclusive)
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
    #[serde(default = "default_since")]
    pub since: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Message key that terminates field extraction
    #[serde(default = "default_marker_key")]
    pub marker_key: String,
    /// Emit a progress event every N parsed records
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Number of entries printed per report section
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub mode: AggregationMode,
    /// Histogram bucket edges in milliseconds
    #[serde(default = "default_histogram_edges")]
    pub histogram_edges: Vec<f64>,
}

/// Memory vs. single-pass trade-off for the aggregation stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Materialize every analyzed record, then group and rank
    #[default]
    Materialized,
    /// Fold records into per-path accumulators as they arrive
    Streaming,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialized => write!(f, "materialized"),
            Self::Streaming => write!(f, "streaming"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            search: SearchSettings::default(),
            filter: FilterSettings::default(),
            cache: CacheSettings::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: default_search_url(),
            index: default_index(),
            page_size: default_page_size(),
            scroll_keepalive: default_scroll_keepalive(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            ident_field: default_ident_field(),
            ident: default_ident(),
            host_field: default_host_field(),
            host_pattern: default_host_pattern(),
            message_field: default_message_field(),
            message_match: default_message_match(),
            timestamp_field: default_timestamp_field(),
            since: default_since(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            marker_key: default_marker_key(),
            progress_interval: default_progress_interval(),
            top_n: default_top_n(),
            mode: AggregationMode::default(),
            histogram_edges: default_histogram_edges(),
        }
    }
}

/// Loaders only read the sources. Call [`validation::validate_config`] once all
/// overrides are applied.
impl Settings {
    /// Load configuration from a specific config file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Env vars take priority over the file
        let settings: Settings = ConfigBuilder::builder()
            .add_source(File::with_name(&path.as_ref().to_string_lossy()))
            .add_source(
                Environment::with_prefix("ROUTE_LATENCY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(settings)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // NOTE: It's ok if this fails (file might not exist)
        let _ = dotenvy::dotenv();

        let settings: Settings = ConfigBuilder::builder()
            .add_source(
                Environment::with_prefix("ROUTE_LATENCY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(settings)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{\n\
             \tLog Level: {}\n\
             \tSearch URL: {}\n\
             \tIndex: {}\n\
             \tPage Size: {}\n\
             \tAuthenticated: {}\n\
             \tFilter: {}={} {}={} {}~{} {}>={}\n\
             \tCache: {} ({})\n\
             \tMarker Key: {}\n\
             \tTop N: {}\n\
             \tMode: {}\n\
             }}",
            self.log_level,
            self.search.url,
            self.search.index,
            self.search.page_size,
            self.search.username.is_some(),
            self.filter.ident_field,
            self.filter.ident,
            self.filter.host_field,
            self.filter.host_pattern,
            self.filter.message_field,
            self.filter.message_match,
            self.filter.timestamp_field,
            self.filter.since,
            self.cache.path.display(),
            if self.cache.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.analysis.marker_key,
            self.analysis.top_n,
            self.analysis.mode,
        )
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index() -> String {
    "logstash-*".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_scroll_keepalive() -> String {
    "5m".to_string()
}

fn default_ident_field() -> String {
    "ident.raw".to_string()
}

fn default_ident() -> String {
    "rails".to_string()
}

fn default_host_field() -> String {
    "host.raw".to_string()
}

fn default_host_pattern() -> String {
    "ci*".to_string()
}

fn default_message_field() -> String {
    "message".to_string()
}

fn default_message_match() -> String {
    "duration".to_string()
}

fn default_timestamp_field() -> String {
    "@timestamp".to_string()
}

fn default_since() -> String {
    "2016-10-19T00:00:00".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_marker_key() -> String {
    "params".to_string()
}

fn default_progress_interval() -> u64 {
    1000
}

fn default_top_n() -> usize {
    25
}

fn default_histogram_edges() -> Vec<f64> {
    vec![
        0.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 15000.0, 20000.0, 25000.0, 30000.0,
    ]
}
