//! Offset-paged fetching
//!
//! `PagedFetcher` drives a `PageSource` from offset 0 until the reported
//! total is reached, collecting every row in offset order.

use super::types::{FetchResult, PageRequest, PageResponse, PaginationState, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use tracing::{debug, info};

/// An endpoint that returns one page of records for a request
///
/// Implementations report transport failures and API-reported errors as
/// distinct `Error` variants. A page with no rows is not an error.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &str {
        "source"
    }

    /// Fetch the page described by `request`
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse>;
}

/// Collects every page of an offset-paged endpoint
#[derive(Debug, Clone, Copy)]
pub struct PagedFetcher {
    limit: u32,
}

impl Default for PagedFetcher {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagedFetcher {
    /// Create a fetcher with the given page size
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        Ok(Self { limit })
    }

    /// Page size used for every request
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetch all records matching `params`.
    ///
    /// Stops once `offset + limit >= total` for the page just fetched. Any
    /// page error aborts the fetch and the rows collected so far are dropped.
    pub async fn fetch_all<S>(&self, source: &S, params: &StringMap) -> Result<FetchResult>
    where
        S: PageSource + ?Sized,
    {
        let mut state = PaginationState::new(self.limit);
        let mut records = Vec::new();

        loop {
            let request = PageRequest::new(params.clone(), state.offset, self.limit);
            let page = source.fetch_page(&request).await?;

            if state.pages == 0 {
                info!("{}: {} rows found", source.name(), page.total_results);
            }
            debug!(
                "{}: {}-{}",
                source.name(),
                request.offset + 1,
                request.offset + page.rows.len() as u64
            );

            let stop = state.record_page(page.total_results, page.rows.len());
            records.extend(page.rows);

            if stop.should_stop() {
                break;
            }
        }

        debug!(
            "{}: collected {} rows in {} pages",
            source.name(),
            records.len(),
            state.pages
        );
        Ok(FetchResult::new(records, state.pages, state.last_total))
    }
}
