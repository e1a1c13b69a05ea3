//! Fan-out over key batches
//!
//! Splits a long identifier list into request-sized chunks, runs one paged
//! fetch per chunk, and stitches the results back together in chunk order.

use super::fetcher::{PageSource, PagedFetcher};
use super::types::FetchResult;
use crate::error::{Error, Result};
use crate::types::StringMap;
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;
use tracing::debug;

/// Chunk size used when none is configured
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Separator used when a chunk is sent as one parameter
pub const KEY_DELIMITER: &str = ",";

/// Split `items` into contiguous chunks of at most `chunk_size`, keeping order
pub fn chunk_keys<T: Clone>(items: &[T], chunk_size: usize) -> Vec<Vec<T>> {
    if chunk_size == 0 {
        return Vec::new();
    }
    items.chunks(chunk_size).map(<[T]>::to_vec).collect()
}

/// Identifiers partitioned into request-sized chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBatch {
    keys: Vec<String>,
    chunk_size: usize,
}

impl KeyBatch {
    /// Create a batch; `chunk_size` must be positive
    pub fn new(keys: Vec<String>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_value("chunk_size", "must be greater than 0"));
        }
        Ok(Self { keys, chunk_size })
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of chunks
    pub fn chunk_count(&self) -> usize {
        self.keys.len().div_ceil(self.chunk_size)
    }

    /// Chunks in order
    pub fn chunks(&self) -> std::slice::Chunks<'_, String> {
        self.keys.chunks(self.chunk_size)
    }

    /// Each chunk joined into a single comma-delimited string
    pub fn joined(&self) -> Vec<String> {
        self.chunks().map(|chunk| chunk.join(KEY_DELIMITER)).collect()
    }
}

/// Runs one paged fetch per key chunk
#[derive(Debug, Clone, Copy)]
pub struct BatchedFetcher {
    chunk_size: usize,
    concurrency: usize,
}

impl Default for BatchedFetcher {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: 1,
        }
    }
}

impl BatchedFetcher {
    /// Create a sequential batched fetcher
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_value("chunk_size", "must be greater than 0"));
        }
        Ok(Self {
            chunk_size,
            concurrency: 1,
        })
    }

    /// Allow up to `concurrency` chunk fetches in flight (0 is treated as 1)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Maximum chunk fetches in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch every chunk of `keys` with `per_chunk` and concatenate the results.
    ///
    /// `per_chunk` receives one comma-joined chunk. Results keep chunk order
    /// even when chunks run concurrently. An empty key list returns an empty
    /// result without calling `per_chunk`; the first failing chunk fails the
    /// whole operation.
    pub async fn fetch_all_by_keys<F, Fut>(
        &self,
        keys: &[String],
        per_chunk: F,
    ) -> Result<FetchResult>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<FetchResult>>,
    {
        if keys.is_empty() {
            debug!("No keys given, skipping batched fetch");
            return Ok(FetchResult::empty());
        }

        let batch = KeyBatch::new(keys.to_vec(), self.chunk_size)?;
        let chunk_count = batch.chunk_count();
        debug!(
            "Fetching {} keys in {} chunks of up to {}",
            batch.len(),
            chunk_count,
            self.chunk_size
        );

        let parts: Vec<FetchResult> = stream::iter(batch.joined().into_iter().enumerate())
            .map(|(index, chunk)| {
                debug!("Chunk {}/{}", index + 1, chunk_count);
                per_chunk(chunk)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(FetchResult::concat(parts))
    }

    /// Batched fetch where each chunk is sent as `params[key_param]`
    pub async fn fetch_by_key_param<S>(
        &self,
        fetcher: &PagedFetcher,
        source: &S,
        params: &StringMap,
        key_param: &str,
        keys: &[String],
    ) -> Result<FetchResult>
    where
        S: PageSource + ?Sized,
    {
        self.fetch_all_by_keys(keys, |chunk| {
            let mut chunk_params = params.clone();
            chunk_params.insert(key_param.to_string(), chunk);
            async move { fetcher.fetch_all(source, &chunk_params).await }
        })
        .await
    }
}
