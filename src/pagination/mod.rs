//! Pagination module
//!
//! Supports: offset/limit paging driven by a reported total, and fan-out of
//! long key lists across chunked requests.
//!
//! # Overview
//!
//! A `PageSource` returns one page for an offset and limit. `PagedFetcher`
//! walks the pages until the reported total is reached. `BatchedFetcher`
//! splits identifier lists into chunks and runs one paged fetch per chunk.

mod batch;
mod fetcher;
mod types;

pub use batch::{chunk_keys, BatchedFetcher, KeyBatch, DEFAULT_CHUNK_SIZE, KEY_DELIMITER};
pub use fetcher::{PageSource, PagedFetcher};
pub use types::{
    check_total_reached, FetchResult, PageRequest, PageResponse, PaginationState, StopResult,
    DEFAULT_PAGE_SIZE, LIMIT_PARAM, OFFSET_PARAM,
};
