//! Pardot object kinds, query defaults, and shared request types

use crate::types::{JsonValue, StringMap};
use std::collections::BTreeSet;
use std::fmt;

/// Default prospect fields
pub const DEFAULT_PROSPECT_FIELDS: &str = "id,crm_lead_fid,email,company,campaign,created_at,updated_at";

/// Default visitor activity types: click, view, form success, email, visit, session
pub const DEFAULT_ACTIVITY_TYPES: &str = "1,2,4,6,11,21";

/// Maximum number of records the v5 API will page through
pub const V5_RECORD_CAP: usize = 100_000;

/// Parameter names used by the v4 query endpoints
pub const UPDATED_AFTER_PARAM: &str = "updated_after";
pub const UPDATED_BEFORE_PARAM: &str = "updated_before";

/// Objects served by the v4 query endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PardotObject {
    Prospect,
    Visit,
    VisitorActivity,
}

impl PardotObject {
    /// Path segment in `/api/{segment}/version/{n}/do/query`
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Visit => "visit",
            Self::VisitorActivity => "visitorActivity",
        }
    }

    /// Key holding the records inside `result`
    pub fn record_key(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Visit => "visit",
            Self::VisitorActivity => "visitor_activity",
        }
    }

    /// Plural name used in logs
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Prospect => "prospects",
            Self::Visit => "visits",
            Self::VisitorActivity => "visitor activities",
        }
    }
}

impl fmt::Display for PardotObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Bounds applied as `updated_after` / `updated_before`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to }
    }

    /// Insert the bounds that are set into `params`
    pub fn apply(&self, params: &mut StringMap) {
        if let Some(from) = &self.from {
            params.insert(UPDATED_AFTER_PARAM.to_string(), from.clone());
        }
        if let Some(to) = &self.to {
            params.insert(UPDATED_BEFORE_PARAM.to_string(), to.clone());
        }
    }
}

/// Which visitor activities to fetch
#[derive(Debug, Clone, Copy)]
pub enum ActivityScope<'a> {
    /// Prospect activities updated within the date range
    Updated,
    /// Activities of the given prospects, batched by ID
    ByProspects(&'a [String]),
}

/// Unique `id` values of `records`, rendered as strings and sorted as strings.
///
/// Records without an `id` are skipped.
pub fn prospect_ids(records: &[JsonValue]) -> Vec<String> {
    let ids: BTreeSet<String> = records
        .iter()
        .filter_map(|record| record.get("id"))
        .filter_map(id_to_string)
        .collect();
    ids.into_iter().collect()
}

fn id_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}
