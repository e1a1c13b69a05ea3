//! v4 query endpoint: response decoding and the `PageSource` adapter

use super::client::PardotClient;
use super::types::PardotObject;
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, PageResponse, PageSource};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;

/// Decode a v4 query body into one page.
///
/// `stat=fail` bodies become `Error::Api`. A single record sent as an object
/// is treated as a one-row page, and a missing record key as an empty page.
pub fn parse_query_response(body: &JsonValue, object: PardotObject) -> Result<PageResponse> {
    if let Some(err) = failure(body) {
        return Err(err);
    }

    let result = body
        .get("result")
        .ok_or_else(|| Error::decode(format!("{object} response has no 'result'")))?;

    let total_results = match result.get("total_results") {
        Some(JsonValue::Number(n)) => n.as_u64(),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::decode(format!("{object} response has no valid 'total_results'")))?;

    let rows = match result.get(object.record_key()) {
        Some(JsonValue::Array(items)) => items.clone(),
        Some(JsonValue::Null) | None => Vec::new(),
        Some(single) => vec![single.clone()],
    };

    Ok(PageResponse::new(total_results, rows))
}

/// The API error carried by a `stat=fail` body, if any
pub fn failure(body: &JsonValue) -> Option<Error> {
    let attributes = body.get("@attributes")?;
    if attributes.get("stat").and_then(JsonValue::as_str) != Some("fail") {
        return None;
    }

    let payload = json!({
        "code": attributes.get("err_code").cloned().unwrap_or(JsonValue::Null),
        "message": body.get("err").cloned().unwrap_or(JsonValue::Null),
    });
    Some(Error::api_from_payload(&payload))
}

/// One v4 query endpoint, pageable by `PagedFetcher`
#[derive(Debug, Clone, Copy)]
pub struct PardotQuery<'a> {
    client: &'a PardotClient,
    object: PardotObject,
}

impl<'a> PardotQuery<'a> {
    pub fn new(client: &'a PardotClient, object: PardotObject) -> Self {
        Self { client, object }
    }

    pub fn object(&self) -> PardotObject {
        self.object
    }
}

#[async_trait]
impl PageSource for PardotQuery<'_> {
    fn name(&self) -> &str {
        self.object.plural()
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse> {
        self.client.query(self.object, request).await
    }
}
