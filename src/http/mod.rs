//! HTTP client module
//!
//! GET client used by the Pardot adapters.
//!
//! # Features
//!
//! - **Retries**: `RetryPolicy` with backoff, off unless configured
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer or refreshed token from the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy, USER_AGENT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
