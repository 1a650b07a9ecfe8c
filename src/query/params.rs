//! # List Parameters
//!
//! Decodes the loosely typed list request body (`limit`, `page`, `from`, `to`,
//! `q`) into [`ListParams`].
//!
//! Decoding never fails. A value that is missing, null, non-positive or not a
//! number counts as absent and the builder applies its default.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Decoded list parameters; `None` means "not supplied"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Decode from a JSON object. Non-object values decode to all-absent.
    pub fn from_json(body: &Value) -> Self {
        match body.as_object() {
            Some(map) => Self::from_lookup(|key| map.get(key).cloned()),
            None => Self::default(),
        }
    }

    /// Decode from a JSON body, consulting `fallback` for keys the body lacks
    pub fn from_sources(body: &Map<String, Value>, fallback: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| match body.get(key) {
            Some(v) if !v.is_null() => Some(v.clone()),
            _ => fallback.get(key).map(|s| Value::String(s.clone())),
        })
    }

    fn from_lookup(get: impl Fn(&str) -> Option<Value>) -> Self {
        Self {
            limit: get("limit").as_ref().and_then(positive_integer),
            page: get("page").as_ref().and_then(positive_integer),
            from: get("from").as_ref().and_then(non_empty_text),
            to: get("to").as_ref().and_then(non_empty_text),
            search: get("q").as_ref().and_then(non_empty_text),
        }
    }

    /// Both range bounds, only when both are present
    pub fn date_range(&self) -> Option<(&str, &str)> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some((from.as_str(), to.as_str())),
            _ => None,
        }
    }
}

/// A JSON integer >= 1, or a string holding one
fn positive_integer(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (n >= 1).then_some(n)
}

/// A non-blank string, or a number rendered as text
fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_body() {
        let params = ListParams::from_json(&json!({
            "limit": 10,
            "page": 2,
            "from": "2024-01-01",
            "to": "2024-01-31",
            "q": "rust"
        }));

        assert_eq!(params.limit, Some(10));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.date_range(), Some(("2024-01-01", "2024-01-31")));
        assert_eq!(params.search.as_deref(), Some("rust"));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        for bad in [json!(0), json!(-3), json!(2.5), json!("ten"), json!(true), json!(null)] {
            let params = ListParams::from_json(&json!({ "limit": bad, "page": bad }));
            assert_eq!(params.limit, None, "limit {bad}");
            assert_eq!(params.page, None, "page {bad}");
        }
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let params = ListParams::from_json(&json!({ "limit": " 15 ", "page": "3" }));
        assert_eq!(params.limit, Some(15));
        assert_eq!(params.page, Some(3));
    }

    #[test]
    fn test_single_bound_gives_no_range() {
        let params = ListParams::from_json(&json!({ "from": "2024-01-01" }));
        assert_eq!(params.date_range(), None);

        let params = ListParams::from_json(&json!({ "to": "2024-01-01", "from": "" }));
        assert_eq!(params.date_range(), None);
    }

    #[test]
    fn test_blank_search_is_absent() {
        let params = ListParams::from_json(&json!({ "q": "   " }));
        assert_eq!(params.search, None);
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(ListParams::from_json(&json!(null)), ListParams::default());
        assert_eq!(ListParams::from_json(&json!([1, 2])), ListParams::default());
    }

    #[test]
    fn test_query_string_fallback() {
        let body = json!({ "limit": 5, "page": null }).as_object().cloned().unwrap();
        let mut query = HashMap::new();
        query.insert("limit".to_string(), "50".to_string());
        query.insert("page".to_string(), "4".to_string());
        query.insert("q".to_string(), "launch".to_string());

        let params = ListParams::from_sources(&body, &query);
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.page, Some(4));
        assert_eq!(params.search.as_deref(), Some("launch"));
    }
}
