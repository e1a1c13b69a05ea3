//! Pardot HTTP client
//!
//! Wraps the shared `HttpClient` with the business unit header, the
//! configured credentials, and Pardot's error body conventions.

use super::query::{failure, parse_query_response};
use super::types::PardotObject;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{PageRequest, PageResponse};
use crate::types::{JsonValue, StringMap};
use tracing::debug;

/// Client for the Pardot v4 query endpoints and v5 object endpoints
#[derive(Debug)]
pub struct PardotClient {
    http: HttpClient,
    api_version: u32,
}

impl PardotClient {
    /// Wrap an already configured HTTP client
    pub fn new(http: HttpClient, api_version: u32) -> Self {
        Self { http, api_version }
    }

    /// Build a client from validated configuration.
    ///
    /// No token is requested here; with a refresh token the exchange
    /// happens on the first request.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::with_auth(config.http_client_config(), config.auth_config()?)?;
        Ok(Self::new(http, config.api_version))
    }

    /// API version used for v4-style query paths
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Path of the query endpoint for `object`
    pub fn query_path(&self, object: PardotObject) -> String {
        format!(
            "api/{}/version/{}/do/query",
            object.path_segment(),
            self.api_version
        )
    }

    /// Fetch one page from a v4 query endpoint
    pub async fn query(&self, object: PardotObject, request: &PageRequest) -> Result<PageResponse> {
        let path = self.query_path(object);
        let mut query = request.to_query();
        query.insert("format".to_string(), "json".to_string());

        debug!("GET {} offset={} limit={}", path, request.offset, request.limit);
        let body = self
            .get_json(&path, &query)
            .await
            .map_err(v4_status_to_api)?;

        parse_query_response(&body, object)
    }

    /// GET a path or absolute URL and decode the body as JSON
    pub async fn get_json(&self, url: &str, query: &StringMap) -> Result<JsonValue> {
        let response = self.http.get(url, query).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("invalid JSON from {url}: {e}")))
    }
}

/// A non-2xx response whose body is a v4 `stat=fail` document is an API error
fn v4_status_to_api(err: Error) -> Error {
    if let Error::HttpStatus { body, .. } = &err {
        if let Some(api) = serde_json::from_str::<JsonValue>(body)
            .ok()
            .and_then(|json| failure(&json))
        {
            return api;
        }
    }
    err
}
