//! Pardot operations
//!
//! Prospects updated in a date range, and the visits and visitor
//! activities belonging to them. Prospect IDs flow from
//! `get_active_prospects` to the per-prospect fetches as plain values.

use super::client::PardotClient;
use super::query::PardotQuery;
use super::types::{
    prospect_ids, ActivityScope, DateRange, PardotObject, DEFAULT_ACTIVITY_TYPES,
    DEFAULT_PROSPECT_FIELDS,
};
use crate::config::Config;
use crate::error::Result;
use crate::pagination::{BatchedFetcher, FetchResult, PagedFetcher};
use crate::types::StringMap;
use tracing::info;

/// Parameter carrying prospect IDs on the visit endpoint
const VISIT_KEY_PARAM: &str = "prospect_ids";

/// Parameter carrying prospect IDs on the visitor activity endpoint
const ACTIVITY_KEY_PARAM: &str = "prospect_id";

/// High-level Pardot reader
#[derive(Debug)]
pub struct Pardot {
    client: PardotClient,
    dates: DateRange,
    fetcher: PagedFetcher,
    batched: BatchedFetcher,
    activity_types: String,
}

impl Pardot {
    pub fn new(client: PardotClient, fetcher: PagedFetcher, batched: BatchedFetcher) -> Self {
        Self {
            client,
            dates: DateRange::default(),
            fetcher,
            batched,
            activity_types: DEFAULT_ACTIVITY_TYPES.to_string(),
        }
    }

    /// Build a reader from configuration, including its date range
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut pardot = Self::new(
            PardotClient::from_config(config)?,
            config.paged_fetcher()?,
            config.batched_fetcher()?,
        );
        pardot.set_dates(config.date_from.clone(), config.date_to.clone());
        Ok(pardot)
    }

    /// Set the `updated_after` / `updated_before` bounds
    pub fn set_dates(&mut self, from: Option<String>, to: Option<String>) {
        self.dates = DateRange::new(from, to);
    }

    pub fn dates(&self) -> &DateRange {
        &self.dates
    }

    /// Override the visitor activity type filter
    #[must_use]
    pub fn with_activity_types(mut self, types: impl Into<String>) -> Self {
        self.activity_types = types.into();
        self
    }

    pub fn client(&self) -> &PardotClient {
        &self.client
    }

    /// Prospects updated within the date range, plus their IDs.
    ///
    /// IDs are unique, rendered as strings, and sorted as strings. An
    /// empty result yields an empty ID list.
    pub async fn get_active_prospects(
        &self,
        fields: Option<&str>,
    ) -> Result<(FetchResult, Vec<String>)> {
        let mut params = self.dated_params();
        params.insert(
            "fields".to_string(),
            fields.unwrap_or(DEFAULT_PROSPECT_FIELDS).to_string(),
        );
        params.insert("sort_by".to_string(), "updated_at".to_string());

        let source = PardotQuery::new(&self.client, PardotObject::Prospect);
        let result = self.fetcher.fetch_all(&source, &params).await?;
        let ids = prospect_ids(result.records());

        info!("{} prospects, {} unique IDs", result.len(), ids.len());
        Ok((result, ids))
    }

    /// Visits of the given prospects, batched over the IDs
    pub async fn get_visits(&self, prospect_ids: &[String]) -> Result<FetchResult> {
        let source = PardotQuery::new(&self.client, PardotObject::Visit);
        let result = self
            .batched
            .fetch_by_key_param(
                &self.fetcher,
                &source,
                &StringMap::new(),
                VISIT_KEY_PARAM,
                prospect_ids,
            )
            .await?;

        info!("{} visits for {} prospects", result.len(), prospect_ids.len());
        Ok(result)
    }

    /// Visitor activities, either by update date or by prospect
    pub async fn get_activities(&self, scope: ActivityScope<'_>) -> Result<FetchResult> {
        let source = PardotQuery::new(&self.client, PardotObject::VisitorActivity);
        let mut params = self.dated_params();
        params.insert("type".to_string(), self.activity_types.clone());

        let result = match scope {
            ActivityScope::Updated => {
                params.insert("prospect_only".to_string(), "true".to_string());
                self.fetcher.fetch_all(&source, &params).await?
            }
            ActivityScope::ByProspects(ids) => {
                self.batched
                    .fetch_by_key_param(&self.fetcher, &source, &params, ACTIVITY_KEY_PARAM, ids)
                    .await?
            }
        };

        info!("{} visitor activities", result.len());
        Ok(result)
    }

    fn dated_params(&self) -> StringMap {
        let mut params = StringMap::new();
        self.dates.apply(&mut params);
        params
    }
}
