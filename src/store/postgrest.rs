//! # PostgREST Store
//!
//! Executes prepared queries against a hosted PostgREST endpoint
//! (`{url}/rest/v1/{table}`), the interface Supabase exposes.
//!
//! Wire mapping:
//! - predicates become `field=op.value` query pairs, `ilike` using `*` wildcards
//! - ordering becomes `order=field.asc,other.desc`
//! - the row window becomes `offset` / `limit`
//! - exact counts are requested with `Prefer: count=exact` and read back from
//!   `Content-Range: start-end/total`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_RANGE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::filter::{FilterExpr, FilterOperator, OrderBy};
use super::{CountMode, DataStore, PreparedQuery, QueryOutput};

/// PostgREST connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// API key sent as `apikey` and as the bearer credential
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for PostgrestConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: String,
}

/// Data store backed by a PostgREST endpoint
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(config: &PostgrestConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self, query: &PreparedQuery) -> StoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if !self.api_key.is_empty() {
            let key = HeaderValue::from_str(&self.api_key)
                .map_err(|_| StoreError::Transport("API key is not a valid header".to_string()))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| StoreError::Transport("API key is not a valid header".to_string()))?;
            headers.insert("apikey", key);
            headers.insert(AUTHORIZATION, bearer);
        }

        if query.count == CountMode::Exact {
            headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        }

        Ok(headers)
    }
}

/// Render a prepared query as PostgREST query pairs
pub fn query_pairs(query: &PreparedQuery) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];

    for filter in &query.filters {
        pairs.push((filter.field.clone(), render_filter(filter)));
    }

    if !query.order.is_empty() {
        pairs.push(("order".to_string(), render_order(&query.order)));
    }

    if let Some(window) = query.window {
        pairs.push(("offset".to_string(), window.offset.to_string()));
        pairs.push(("limit".to_string(), window.limit.to_string()));
    }

    pairs
}

fn render_filter(filter: &FilterExpr) -> String {
    let value = match &filter.value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let value = match filter.operator {
        // PostgREST reads `*` as the LIKE wildcard in URLs
        FilterOperator::ILike => value.replace('%', "*"),
        _ => value,
    };

    format!("{}.{}", filter.operator.as_str(), value)
}

fn render_order(order: &[OrderBy]) -> String {
    order
        .iter()
        .map(|o| format!("{}.{}", o.field, if o.ascending { "asc" } else { "desc" }))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the total out of `Content-Range: 0-9/42`. `*` means unknown.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
impl DataStore for PostgrestStore {
    async fn execute(&self, query: &PreparedQuery) -> StoreResult<QueryOutput> {
        let pairs = query_pairs(query);
        debug!(table = %query.table, ?pairs, "postgrest query");

        let response = self
            .client
            .get(self.table_url(&query.table))
            .headers(self.headers(query)?)
            .query(&pairs)
            .send()
            .await?;

        let status = response.status();
        let count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        if !status.is_success() {
            let body = response.text().await?;
            let message = match serde_json::from_str::<PostgrestErrorBody>(&body) {
                Ok(err) => err.message,
                Err(_) if body.trim().is_empty() => status.to_string(),
                Err(_) => body,
            };
            return Err(StoreError::rejected(status.as_u16(), message));
        }

        let rows: Vec<Value> = response.json().await?;

        let count = match query.count {
            CountMode::Exact => count,
            CountMode::None => None,
        };

        Ok(QueryOutput { rows, count })
    }

    fn backend_name(&self) -> &'static str {
        "postgrest"
    }
}
