use clap::{Parser, Subcommand};
use route_latency::{report::ReportFormat, settings::AggregationMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "route-latency",
    about = "Per-endpoint latency reports from application logs stored in Elasticsearch",
    version,
    author,
    after_help = r#"Configuration:
    Configuration can be provided via:
    1. Environment variables with ROUTE_LATENCY__ prefix (e.g., ROUTE_LATENCY__SEARCH__URL)
    2. .env file in the current directory
    3. Config file with -c option (see example.config.toml)

Examples:
    # Report from the cache file, fetching it first if missing
    route-latency report

    # Ignore the cache and fetch everything again
    route-latency report --refresh

    # Single pass over the index without keeping records in memory
    route-latency report --mode streaming --no-cache

    # Only refresh the cache file
    route-latency fetch --since 2016-10-19T00:00:00"#
)]
pub struct Cli {
    /// Path to the configuration file (TOML format)
    ///
    /// If not provided, will attempt to load from environment variables
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that talk to the index
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FetchOptions {
    /// Only records at or after this timestamp (ISO-8601)
    #[arg(long, value_name = "TIMESTAMP")]
    pub since: Option<String>,

    /// Cache file location
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the slowest endpoints and requests
    Report {
        #[command(flatten)]
        fetch: FetchOptions,

        /// Ignore an existing cache file and fetch again
        #[arg(long)]
        refresh: bool,

        /// Neither read nor write the cache file
        #[arg(long, conflicts_with = "refresh")]
        no_cache: bool,

        /// Entries per report section
        #[arg(short = 'n', long, value_name = "NUM")]
        top: Option<usize>,

        /// Aggregation strategy
        #[arg(long, value_enum)]
        mode: Option<AggregationMode>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Fetch and parse records into the cache file, overwriting it
    Fetch {
        #[command(flatten)]
        fetch: FetchOptions,
    },

    /// Print the fields extracted from one log message
    Parse {
        /// The raw message, e.g. "method=GET path=/users duration=12.5"
        message: String,
    },
}
