//! # In-Memory Store
//!
//! Evaluates prepared queries against JSON rows held in memory. Used for local
//! development (`serve --memory-seed`) and tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filter::{compare_json_values, OrderBy};
use super::{CountMode, DataStore, PreparedQuery, QueryOutput};

/// In-memory data store
#[derive(Default)]
pub struct InMemoryStore {
    /// table -> rows, in insertion order
    tables: RwLock<HashMap<String, Vec<Value>>>,

    /// When set, every query fails with this message
    failure: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a seed document shaped `{ "<table>": [rows...] }`
    pub fn from_seed(seed: Value) -> StoreResult<Self> {
        let tables = match seed {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::Decode(format!(
                    "seed must be an object of tables, got {}",
                    json_kind(&other)
                )))
            }
        };

        let store = Self::new();
        for (table, rows) in tables {
            match rows {
                Value::Array(rows) => store.insert_rows(&table, rows)?,
                other => {
                    return Err(StoreError::Decode(format!(
                        "table '{}' must be an array of rows, got {}",
                        table,
                        json_kind(&other)
                    )))
                }
            }
        }
        Ok(store)
    }

    /// Create `table` if missing and append `rows` to it
    pub fn insert_rows(&self, table: &str, rows: Vec<Value>) -> StoreResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Transport("store lock poisoned".to_string()))?;
        tables.entry(table.to_string()).or_default().extend(rows);
        Ok(())
    }

    /// Make every subsequent query fail with `message`; `None` clears it
    pub fn set_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = message.map(str::to_string);
        }
    }

    /// Number of rows in `table`
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn execute(&self, query: &PreparedQuery) -> StoreResult<QueryOutput> {
        if let Ok(failure) = self.failure.read() {
            if let Some(message) = failure.as_ref() {
                return Err(StoreError::rejected(400, message.clone()));
            }
        }

        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Transport("store lock poisoned".to_string()))?;
        let rows = tables
            .get(&query.table)
            .ok_or_else(|| StoreError::UnknownTable(query.table.clone()))?;

        let mut matched: Vec<&Value> = rows.iter().filter(|r| query.matches(r)).collect();
        apply_ordering(&mut matched, &query.order);

        let count = match query.count {
            CountMode::Exact => Some(matched.len() as u64),
            CountMode::None => None,
        };

        let rows = match query.window {
            Some(window) => matched
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matched.into_iter().cloned().collect(),
        };

        Ok(QueryOutput { rows, count })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Stable sort; rows missing a key sort after rows that have it
fn apply_ordering(rows: &mut [&Value], order: &[OrderBy]) {
    if order.is_empty() {
        return;
    }

    rows.sort_by(|a, b| {
        for key in order {
            let cmp = match (non_null(a, &key.field), non_null(b, &key.field)) {
                (Some(a), Some(b)) => {
                    let cmp = compare_json_values(a, b).unwrap_or(Ordering::Equal);
                    if key.ascending {
                        cmp
                    } else {
                        cmp.reverse()
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

fn non_null<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    doc.get(field).filter(|v| !v.is_null())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
