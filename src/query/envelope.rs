//! # Response Envelopes
//!
//! Uniform response shapes for list and single-record reads.

use serde::Serialize;
use serde_json::Value;

/// Pagination block of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    /// Rows matching the filters across all pages; `null` if the store gave no count
    pub total: Option<u64>,
}

/// List response: `{ data, pagination }`
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T: Serialize = Value> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> ListEnvelope<T> {
    /// Wrap a page of rows. Rows are passed through as returned.
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: Option<u64>) -> Self {
        Self {
            data,
            pagination: Pagination {
                page,
                per_page: limit,
                total,
            },
        }
    }
}

/// Single record response: `{ data }`, with `data: null` when nothing matched
#[derive(Debug, Clone, Serialize)]
pub struct SingleEnvelope<T: Serialize = Value> {
    pub data: Option<T>,
}

impl<T: Serialize> SingleEnvelope<T> {
    /// Keep the first row, if any
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            data: rows.into_iter().next(),
        }
    }
}
