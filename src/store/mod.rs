//! # Data Store Client
//!
//! The collection-query interface the API runs against. A [`PreparedQuery`]
//! carries everything a backend needs: table, predicates, ordering, row window
//! and whether an exact match count is wanted.
//!
//! Backends:
//! - [`PostgrestStore`] talks to a hosted PostgREST endpoint over HTTP
//! - [`InMemoryStore`] evaluates queries against seeded JSON rows

pub mod errors;
pub mod filter;
pub mod memory;
pub mod postgrest;

use async_trait::async_trait;
use serde_json::Value;

pub use errors::{StoreError, StoreResult};
pub use filter::{FilterExpr, FilterOperator, OrderBy, RowWindow};
pub use memory::InMemoryStore;
pub use postgrest::{PostgrestConfig, PostgrestStore};

/// Whether the store should report how many rows match the predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    #[default]
    None,
    Exact,
}

/// A fully parameterized query, ready to execute
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    /// Table (collection) to read from
    pub table: String,

    /// Predicates, combined with AND
    pub filters: Vec<FilterExpr>,

    /// Sort keys, applied in order
    pub order: Vec<OrderBy>,

    /// Rows to return; `None` returns every matching row
    pub window: Option<RowWindow>,

    pub count: CountMode,
}

impl PreparedQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: Vec::new(),
            window: None,
            count: CountMode::None,
        }
    }

    pub fn filter(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    pub fn window(mut self, window: RowWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn count(mut self, count: CountMode) -> Self {
        self.count = count;
        self
    }

    /// Check if a document satisfies every predicate
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }
}

/// Rows returned by a query, plus the match count when one was requested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Value>,
    pub count: Option<u64>,
}

/// A backend able to execute prepared queries
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Execute a query. Failures are reported, never retried.
    async fn execute(&self, query: &PreparedQuery) -> StoreResult<QueryOutput>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
