//! Pagination types
//!
//! Requests, responses, and the assembled result of an offset-paged fetch,
//! plus the state that decides when a paging session is over.

use crate::types::{JsonValue, StringMap};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Query parameter names carrying the page window
pub const OFFSET_PARAM: &str = "offset";
pub const LIMIT_PARAM: &str = "limit";

/// One page request: the query parameters plus the page window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint-specific query parameters
    pub params: StringMap,
    /// Number of records to skip
    pub offset: u64,
    /// Maximum number of records in the page
    pub limit: u32,
}

impl PageRequest {
    /// Create a new page request
    pub fn new(params: StringMap, offset: u64, limit: u32) -> Self {
        Self {
            params,
            offset,
            limit,
        }
    }

    /// Query parameters including `offset` and `limit`
    pub fn to_query(&self) -> StringMap {
        let mut query = self.params.clone();
        query.insert(OFFSET_PARAM.to_string(), self.offset.to_string());
        query.insert(LIMIT_PARAM.to_string(), self.limit.to_string());
        query
    }
}

/// One page of results as reported by the endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    /// Total number of matching records, as reported on this page
    pub total_results: u64,
    /// Records in this page, in API order
    pub rows: Vec<JsonValue>,
}

impl PageResponse {
    /// Create a new page response
    pub fn new(total_results: u64, rows: Vec<JsonValue>) -> Self {
        Self {
            total_results,
            rows,
        }
    }
}

/// All records collected by a fetch, in offset order
///
/// An empty result is a valid outcome and is distinct from a failed fetch,
/// which is reported through `Err`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    records: Vec<JsonValue>,
    pages: usize,
    reported_total: Option<u64>,
}

impl FetchResult {
    /// An empty result that made no requests
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from collected records
    pub fn new(records: Vec<JsonValue>, pages: usize, reported_total: Option<u64>) -> Self {
        Self {
            records,
            pages,
            reported_total,
        }
    }

    /// Concatenate results in the given order
    pub fn concat(parts: impl IntoIterator<Item = FetchResult>) -> Self {
        parts.into_iter().fold(Self::empty(), |mut acc, part| {
            acc.records.extend(part.records);
            acc.pages += part.pages;
            acc.reported_total = match (acc.reported_total, part.reported_total) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            };
            acc
        })
    }

    /// The collected records
    pub fn records(&self) -> &[JsonValue] {
        &self.records
    }

    /// Take ownership of the collected records
    pub fn into_records(self) -> Vec<JsonValue> {
        self.records
    }

    /// Number of collected records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were found
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of page requests that produced this result
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Last total reported by the endpoint (summed across chunks)
    pub fn reported_total(&self) -> Option<u64> {
        self.reported_total
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.records.iter()
    }
}

impl IntoIterator for FetchResult {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Result of checking the termination rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Fetch the next page
    Continue,
    /// The session is complete
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Termination rule: the page at `offset` reached or passed `total`
pub fn check_total_reached(offset: u64, limit: u32, total: u64) -> StopResult {
    if offset + u64::from(limit) >= total {
        StopResult::Stop
    } else {
        StopResult::Continue
    }
}

/// Tracks an offset-paging session
#[derive(Debug, Clone)]
pub struct PaginationState {
    /// Offset of the next page to request
    pub offset: u64,
    /// Page size
    pub limit: u32,
    /// Number of pages fetched so far
    pub pages: usize,
    /// Records fetched so far
    pub total_fetched: u64,
    /// Total reported by the most recent page
    pub last_total: Option<u64>,
    /// Is the session complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new state starting at offset 0
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit,
            pages: 0,
            total_fetched: 0,
            last_total: None,
            done: false,
        }
    }

    /// Record a fetched page and advance the offset unless the session is over.
    ///
    /// The total from this page is used as-is; a total that changes between
    /// pages can make the session stop early or run long.
    pub fn record_page(&mut self, total: u64, rows: usize) -> StopResult {
        self.pages += 1;
        self.total_fetched += rows as u64;
        self.last_total = Some(total);

        let result = check_total_reached(self.offset, self.limit, total);
        match result {
            StopResult::Stop => self.done = true,
            StopResult::Continue => self.offset += u64::from(self.limit),
        }
        result
    }
}
