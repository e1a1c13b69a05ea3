//! Configuration for pardot-fetch
//!
//! Credentials, endpoint locations, and fetch/HTTP tuning, loaded from a
//! YAML or JSON file or from an inline JSON string.

use crate::auth::AuthConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy};
use crate::pagination::{BatchedFetcher, PagedFetcher, DEFAULT_CHUNK_SIZE, DEFAULT_PAGE_SIZE};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Header carrying the Pardot business unit
pub const BUSINESS_UNIT_HEADER: &str = "Pardot-Business-Unit-Id";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pardot business unit ID (starts with `0Uv`)
    #[serde(default)]
    pub business_unit_id: String,

    /// Salesforce connected app consumer key
    #[serde(default)]
    pub client_id: Option<String>,

    /// Salesforce connected app consumer secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Refresh token exchanged for an access token on first use
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Access token used as-is (takes precedence over `refresh_token`)
    #[serde(default)]
    pub access_token: Option<String>,

    /// Salesforce login host
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Pardot API host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Version used for the `/api/{object}/version/{n}` endpoints
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// Lower bound for `updated_after`
    #[serde(default)]
    pub date_from: Option<String>,

    /// Upper bound for `updated_before`
    #[serde(default)]
    pub date_to: Option<String>,

    /// Paging and batching settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_login_url() -> String {
    "https://login.salesforce.com".to_string()
}

fn default_base_url() -> String {
    "https://pi.pardot.com".to_string()
}

fn default_api_version() -> u32 {
    4
}

impl Config {
    /// Minimal config for a business unit; everything else defaults
    pub fn new(business_unit_id: impl Into<String>) -> Self {
        Self {
            business_unit_id: business_unit_id.into(),
            client_id: None,
            client_secret: None,
            refresh_token: None,
            access_token: None,
            login_url: default_login_url(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            date_from: None,
            date_to: None,
            fetch: FetchConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Load a config file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        parsed.with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Parse a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that required fields are present and settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.business_unit_id.trim().is_empty() {
            return Err(Error::missing_field("business_unit_id"));
        }

        if self.access_token.is_none() {
            if self.refresh_token.is_none() {
                return Err(Error::config(
                    "Either access_token or refresh_token must be set",
                ));
            }
            if self.client_id.is_none() {
                return Err(Error::missing_field("client_id"));
            }
            if self.client_secret.is_none() {
                return Err(Error::missing_field("client_secret"));
            }
        }

        if !matches!(self.api_version, 3 | 4) {
            return Err(Error::invalid_value(
                "api_version",
                format!("unsupported version {}, expected 3 or 4", self.api_version),
            ));
        }

        url::Url::parse(&self.base_url)?;
        url::Url::parse(&self.login_url)?;

        self.fetch.validate()
    }

    /// Auth settings derived from the credentials
    pub fn auth_config(&self) -> Result<AuthConfig> {
        if let Some(token) = &self.access_token {
            return Ok(AuthConfig::Bearer {
                token: token.clone(),
            });
        }

        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::missing_field("refresh_token"))?;
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("client_id"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or_else(|| Error::missing_field("client_secret"))?;

        Ok(AuthConfig::salesforce_refresh(
            &self.login_url,
            client_id,
            client_secret,
            refresh_token,
        ))
    }

    /// HTTP client settings, including the business unit header
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .retry(RetryPolicy {
                max_retries: self.http.max_retries,
                backoff_type: self.http.backoff.backoff_type,
                initial_backoff: Duration::from_millis(self.http.backoff.initial_ms),
                max_backoff: Duration::from_millis(self.http.backoff.max_ms),
            })
            .rate_limit(self.http.rate_limit.clone())
            .header(BUSINESS_UNIT_HEADER, &self.business_unit_id)
            .build()
    }

    /// Page fetcher using the configured page size
    pub fn paged_fetcher(&self) -> Result<PagedFetcher> {
        PagedFetcher::new(self.fetch.page_size)
    }

    /// Batched fetcher using the configured chunk size and concurrency
    pub fn batched_fetcher(&self) -> Result<BatchedFetcher> {
        Ok(BatchedFetcher::new(self.fetch.chunk_size)?.with_concurrency(self.fetch.concurrency))
    }
}

// ============================================================================
// Fetch Config
// ============================================================================

/// Paging and batching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Records per page (Pardot v4 allows up to 200)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Identifiers per batched request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Key chunks fetched at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            chunk_size: default_chunk_size(),
            concurrency: default_concurrency(),
        }
    }
}

impl FetchConfig {
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("fetch.page_size", "must be greater than 0"));
        }
        if self.chunk_size == 0 {
            return Err(Error::invalid_value("fetch.chunk_size", "must be greater than 0"));
        }
        if self.concurrency == 0 {
            return Err(Error::invalid_value("fetch.concurrency", "must be greater than 0"));
        }
        Ok(())
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_concurrency() -> usize {
    1
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries per request
    #[serde(default)]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: 0,
            backoff: BackoffConfig::default(),
            rate_limit: default_rate_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    60000
}
