//! Pardot (Account Engagement) API adapters
//!
//! - `PardotClient`: authenticated client carrying the business unit header
//! - `PardotQuery`: one v4 query endpoint as a `PageSource`
//! - `Pardot`: prospects, visits, and visitor activities
//! - `PardotV5`: v5 object listings that page by `nextPageUrl`

mod api;
mod client;
mod query;
mod types;
mod v5;

pub use api::Pardot;
pub use client::PardotClient;
pub use query::{parse_query_response, PardotQuery};
pub use types::{
    prospect_ids, ActivityScope, DateRange, PardotObject, DEFAULT_ACTIVITY_TYPES,
    DEFAULT_PROSPECT_FIELDS, V5_RECORD_CAP,
};
pub use v5::{reached_record_cap, PardotV5, V5Page};

#[cfg(test)]
mod tests;
