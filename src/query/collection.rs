//! Resource collections exposed by the API and the store fields backing them.

use serde::Serialize;

/// A resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// News articles
    News,
    /// Events
    Events,
}

/// Store-side description of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Table holding the rows
    pub table: &'static str,
    /// Primary key, matched by get-by-id
    pub id_field: &'static str,
    /// Timestamp compared against `from` / `to`
    pub date_field: &'static str,
    /// Text searched by `q`
    pub title_field: &'static str,
    /// Stable sort key for paging
    pub sort_field: &'static str,
}

const NEWS: CollectionSpec = CollectionSpec {
    table: "news",
    id_field: "id",
    date_field: "publicationdate",
    title_field: "title",
    sort_field: "id",
};

const EVENTS: CollectionSpec = CollectionSpec {
    table: "event",
    id_field: "id",
    date_field: "date",
    title_field: "title",
    sort_field: "id",
};

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::News, Collection::Events];

    pub fn spec(&self) -> &'static CollectionSpec {
        match self {
            Collection::News => &NEWS,
            Collection::Events => &EVENTS,
        }
    }

    /// URL path segment under `/api`
    pub fn path(&self) -> &'static str {
        match self {
            Collection::News => "news",
            Collection::Events => "events",
        }
    }
}
