//! Pardot v5 object reader
//!
//! The v5 API pages by handing back an absolute `nextPageUrl` until it is
//! null. Errors come as non-2xx responses with `{"code", "message"}`.

use super::client::PardotClient;
use super::types::V5_RECORD_CAP;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pagination::FetchResult;
use crate::types::{JsonValue, StringMap};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// One page of a v5 object listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V5Page {
    #[serde(default)]
    pub values: Vec<JsonValue>,
    #[serde(default)]
    pub next_page_url: Option<String>,
}

/// Reader for `/api/v5/objects/{object}`
#[derive(Debug)]
pub struct PardotV5 {
    client: PardotClient,
}

impl PardotV5 {
    pub fn new(client: PardotClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(PardotClient::from_config(config)?))
    }

    /// Path of the object listing
    pub fn object_path(object: &str) -> String {
        format!("api/v5/objects/{}", object.trim_matches('/'))
    }

    /// Read every record of `object`, following `nextPageUrl`.
    ///
    /// `params` (e.g. `fields`, `orderBy`) go on the first request only; the
    /// next-page URLs already carry them.
    pub async fn get(&self, object: &str, params: &StringMap) -> Result<FetchResult> {
        let mut page = self.fetch(&Self::object_path(object), params).await?;
        let mut records = std::mem::take(&mut page.values);
        let mut pages = 1;
        info!("{}: {} records were retrieved", object, records.len());

        while let Some(next) = page.next_page_url.take() {
            debug!("{}: following {}", object, next);
            page = self.fetch(&next, &StringMap::new()).await?;
            records.append(&mut page.values);
            pages += 1;
        }

        info!("{}: total {} records were retrieved", object, records.len());
        if reached_record_cap(records.len()) {
            warn!("DATA LOSS: The limit of 100,000 records is reached.");
        }

        Ok(FetchResult::new(records, pages, None))
    }

    async fn fetch(&self, url: &str, query: &StringMap) -> Result<V5Page> {
        let body = self
            .client
            .get_json(url, query)
            .await
            .map_err(v5_status_to_api)?;
        serde_json::from_value(body).map_err(|e| Error::decode(format!("invalid v5 page: {e}")))
    }
}

/// The v5 listing stops at exactly `V5_RECORD_CAP` records; hitting it
/// means the rest were silently dropped.
pub fn reached_record_cap(count: usize) -> bool {
    count == V5_RECORD_CAP
}

/// Non-2xx responses with a JSON body are API errors
fn v5_status_to_api(err: Error) -> Error {
    if let Error::HttpStatus { body, .. } = &err {
        if let Ok(payload) = serde_json::from_str::<JsonValue>(body) {
            if payload.is_object() {
                return Error::api_from_payload(&payload);
            }
        }
    }
    err
}
