// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pardot-fetch
//!
//! Paged extraction from the Salesforce Pardot (Account Engagement) API.
//!
//! ## Features
//!
//! - **Offset Paging**: Walks v4 query endpoints until the reported total is reached
//! - **Key Batching**: Splits long prospect ID lists into chunked requests, results kept in order
//! - **Salesforce OAuth**: Refresh-token exchange on first request, cached afterwards
//! - **v5 Objects**: Follows `nextPageUrl` across v5 object listings
//! - **Output**: JSON lines, tab-separated tables, or Parquet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pardot_fetch::{config::Config, pardot::{ActivityScope, Pardot}, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load("pardot.yaml")?;
//!     config.validate()?;
//!
//!     let mut pardot = Pardot::from_config(&config)?;
//!     pardot.set_dates(Some("2024-01-01".into()), Some("2024-01-31".into()));
//!
//!     let (prospects, ids) = pardot.get_active_prospects(None).await?;
//!     let visits = pardot.get_visits(&ids).await?;
//!     let activities = pardot.get_activities(ActivityScope::ByProspects(&ids)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Pardot                               │
//! │  get_active_prospects → ids → get_visits / get_activities       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬─────────────────────────┐
//! │   Auth   │   HTTP    │   Paginate    │   Output                │
//! ├──────────┼───────────┼───────────────┼─────────────────────────┤
//! │ Bearer   │ GET       │ Offset/total  │ JSON lines              │
//! │ Refresh  │ Retry     │ Key batches   │ Table (TSV)             │
//! │          │ Rate Limit│ nextPageUrl   │ Parquet                 │
//! └──────────┴───────────┴───────────────┴─────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Offset paging and key batching
pub mod pagination;

/// Pardot endpoint adapters and operations
pub mod pardot;

/// Configuration
pub mod config;

/// Record normalization and writers
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use pagination::{BatchedFetcher, FetchResult, PageSource, PagedFetcher};
pub use pardot::{ActivityScope, Pardot, PardotV5};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
