//! Authentication module
//!
//! Supports: static Bearer tokens and the OAuth2 refresh-token flow used by
//! Salesforce. The `Authenticator` caches refreshed tokens.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken};
