//! CLI commands and argument parsing

use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pardot (Account Engagement) data fetcher
#[derive(Parser, Debug)]
#[command(name = "pardot-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (overrides --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Only records updated after this date/time
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Only records updated before this date/time
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted; required for parquet)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter for this invocation.
    ///
    /// `--verbose` always means DEBUG. Otherwise the `RUST_LOG` directives
    /// apply when set and valid, else INFO.
    pub fn log_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new(LogLevel::Debug.as_directive());
        }
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(LogLevel::default().as_directive()))
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prospects updated within the date range
    Prospects {
        /// Comma-separated prospect fields
        #[arg(long)]
        fields: Option<String>,
    },

    /// Visits of prospects (fetches active prospects when no IDs are given)
    Visits {
        /// Comma-separated prospect IDs
        #[arg(long, value_delimiter = ',')]
        prospect_ids: Vec<String>,
    },

    /// Visitor activities
    Activities {
        /// Select activities by update date or by prospect ID
        #[arg(long, default_value = "updated")]
        by: ActivityBy,

        /// Comma-separated prospect IDs (with --by id)
        #[arg(long, value_delimiter = ',')]
        prospect_ids: Vec<String>,

        /// Comma-separated activity type codes
        #[arg(long)]
        types: Option<String>,
    },

    /// Any object from the v5 API
    V5 {
        /// Object name, e.g. prospects or visitor-activities
        object: String,

        /// Query parameter (repeatable), e.g. --param fields=id,email
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Validate the configuration and exit
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Tab-separated table with a header line
    Pretty,
    /// Parquet file
    Parquet,
}

/// How visitor activities are selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActivityBy {
    /// Activities updated within the date range
    Updated,
    /// Activities of specific prospects
    Id,
}

/// Parse `key=value`
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
