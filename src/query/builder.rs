//! # Query Builder
//!
//! Turns decoded request parameters into a [`PreparedQuery`] for one
//! collection.
//!
//! ## Invariants
//! - `offset = (page - 1) * limit`, never negative
//! - the row window is exactly `[offset, offset + limit - 1]`
//! - a date range applies only when both bounds are supplied
//! - list queries are ordered by the collection's sort key and request an exact count
//! - building never fails

use serde_json::Value;

use crate::store::filter::contains_pattern;
use crate::store::{CountMode, FilterExpr, OrderBy, PreparedQuery, RowWindow};

use super::collection::{Collection, CollectionSpec};
use super::params::ListParams;

/// Default page size if not specified
pub const DEFAULT_LIMIT: u64 = 20;

/// Largest page size served; larger requests are clamped
pub const MAX_LIMIT: u64 = 100;

/// Page size policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// A list query together with the page it was resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct PagedQuery {
    pub query: PreparedQuery,
    pub page: u64,
    pub limit: u64,
}

impl PagedQuery {
    pub fn offset(&self) -> u64 {
        self.query.window.map_or(0, |w| w.offset)
    }
}

/// Builds store queries for one collection
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    spec: &'static CollectionSpec,
    limits: PageLimits,
}

impl QueryBuilder {
    pub fn new(collection: Collection, limits: PageLimits) -> Self {
        Self {
            spec: collection.spec(),
            limits,
        }
    }

    /// Resolve the page size: supplied value or default, clamped to `1..=max_limit`
    pub fn resolve_limit(&self, requested: Option<u64>) -> u64 {
        let max = self.limits.max_limit.max(1);
        requested.unwrap_or(self.limits.default_limit).clamp(1, max)
    }

    /// Build the filtered, windowed, counted list query
    pub fn list(&self, params: &ListParams) -> PagedQuery {
        let limit = self.resolve_limit(params.limit);
        let page = params.page.unwrap_or(1).max(1);
        let offset = (page - 1).saturating_mul(limit);

        let mut query = PreparedQuery::new(self.spec.table);

        if let Some((from, to)) = params.date_range() {
            query = query
                .filter(FilterExpr::gte(self.spec.date_field, Value::from(from)))
                .filter(FilterExpr::lte(self.spec.date_field, Value::from(to)));
        }

        if let Some(search) = &params.search {
            query = query.filter(FilterExpr::ilike(
                self.spec.title_field,
                contains_pattern(search),
            ));
        }

        let query = query
            .order_by(OrderBy::asc(self.spec.sort_field))
            .window(RowWindow::new(offset, limit))
            .count(CountMode::Exact);

        PagedQuery { query, page, limit }
    }

    /// Build an exact-match lookup on the id field, at most one row
    pub fn by_id(&self, id: &str) -> PreparedQuery {
        PreparedQuery::new(self.spec.table)
            .filter(FilterExpr::eq(self.spec.id_field, Value::from(id)))
            .window(RowWindow::new(0, 1))
    }
}
