//! CLI module
//!
//! Command-line interface for fetching Pardot data.
//!
//! # Commands
//!
//! - `prospects` - Prospects updated within the date range
//! - `visits` - Visits of prospects
//! - `activities` - Visitor activities by update date or by prospect
//! - `v5` - Any v5 object, following `nextPageUrl`
//! - `validate` - Check the configuration

mod commands;
mod runner;

pub use commands::{parse_key_val, ActivityBy, Cli, Commands, OutputFormat};
pub use runner::Runner;
