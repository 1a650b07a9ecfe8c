//! # Filter Expression AST
//!
//! Predicates, ordering and row windows understood by every data store backend.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals
    #[serde(rename = "eq")]
    Eq,

    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,

    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,

    /// Case-insensitive pattern match (ILIKE)
    #[serde(rename = "ilike")]
    ILike,
}

impl FilterOperator {
    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
            FilterOperator::ILike => "ilike",
        }
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create an inclusive lower bound
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gte, value)
    }

    /// Create an inclusive upper bound
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Lte, value)
    }

    /// Create a case-insensitive LIKE filter. `pattern` uses SQL wildcards.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::ILike, Value::String(pattern.into()))
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Value) -> bool {
        let field_value = match doc.get(&self.field) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };

        match self.operator {
            FilterOperator::Eq => {
                compare_json_values(field_value, &self.value) == Some(Ordering::Equal)
            }
            FilterOperator::Gte => matches!(
                compare_json_values(field_value, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::Lte => matches!(
                compare_json_values(field_value, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::ILike => match (field_value.as_str(), self.value.as_str()) {
                (Some(text), Some(pattern)) => ilike_match(text, pattern),
                _ => false,
            },
        }
    }
}

/// Compare two JSON values the way a relational store would compare a column to a
/// literal: numbers numerically, everything else by its text form.
pub fn compare_json_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Number(n), Value::String(s)) => {
            let parsed: f64 = s.trim().parse().ok()?;
            n.as_f64()?.partial_cmp(&parsed)
        }
        (Value::String(s), Value::Number(n)) => {
            let parsed: f64 = s.trim().parse().ok()?;
            parsed.partial_cmp(&n.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Escape `%`, `_` and `\` so `text` matches literally inside a LIKE pattern.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Substring pattern for a user search term.
///
/// PostgREST rewrites every `*` in a LIKE value to `%` and offers no escape for
/// it, so a literal `*` cannot be expressed there. It becomes `_` instead, which
/// both backends read as "any one character".
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text).replace('*', "_"))
}

/// Case-insensitive LIKE matching (`%` any run, `_` one char, `\` escapes).
pub fn ilike_match(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.to_lowercase().chars().collect();
    let tokens = tokenize_like(&pattern.to_lowercase());
    like_match_tokens(&value, &tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize_like(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyOne,
            // A trailing backslash matches itself
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Greedy wildcard matching with single-point backtracking.
fn like_match_tokens(value: &[char], tokens: &[LikeToken]) -> bool {
    let (mut v, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match tokens.get(t) {
            Some(LikeToken::AnyRun) => {
                backtrack = Some((t, v));
                t += 1;
            }
            Some(LikeToken::AnyOne) => {
                v += 1;
                t += 1;
            }
            Some(LikeToken::Literal(c)) if *c == value[v] => {
                v += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_t, star_v)) => {
                    t = star_t + 1;
                    v = star_v + 1;
                    backtrack = Some((star_t, star_v + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|tok| *tok == LikeToken::AnyRun)
}

/// Order by clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Inclusive row range `[offset, offset + limit - 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub offset: u64,
    pub limit: u64,
}

impl RowWindow {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// First row index (inclusive)
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Last row index (inclusive). Equal to `start` for an empty window.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("id", json!("42"));

        assert!(filter.matches(&json!({"id": 42})));
        assert!(filter.matches(&json!({"id": "42"})));
        assert!(!filter.matches(&json!({"id": 43})));
        assert!(!filter.matches(&json!({"name": "no id"})));
    }

    #[test]
    fn test_range_filters_are_inclusive() {
        let lower = FilterExpr::gte("date", json!("2024-01-10"));
        let upper = FilterExpr::lte("date", json!("2024-01-20"));

        for (date, inside) in [
            ("2024-01-09", false),
            ("2024-01-10", true),
            ("2024-01-15", true),
            ("2024-01-20", true),
            ("2024-01-21", false),
        ] {
            let doc = json!({ "date": date });
            assert_eq!(lower.matches(&doc) && upper.matches(&doc), inside, "{date}");
        }
    }

    #[test]
    fn test_null_field_never_matches() {
        let filter = FilterExpr::gte("date", json!("2024-01-01"));
        assert!(!filter.matches(&json!({"date": null})));
    }

    #[test]
    fn test_ilike_is_case_insensitive() {
        let filter = FilterExpr::ilike("title", "%abc%");

        assert!(filter.matches(&json!({"title": "ABC news"})));
        assert!(filter.matches(&json!({"title": "the abc"})));
        assert!(filter.matches(&json!({"title": "xAbCx"})));
        assert!(!filter.matches(&json!({"title": "a-b-c"})));
    }

    #[test]
    fn test_like_wildcards() {
        assert!(ilike_match("Johnson", "%son"));
        assert!(ilike_match("Wilson", "%SON"));
        assert!(!ilike_match("Smith", "%son"));
        assert!(ilike_match("cat", "c_t"));
        assert!(!ilike_match("coat", "c_t"));
        assert!(ilike_match("", "%"));
        assert!(ilike_match("aaab", "%a%b"));
    }

    #[test]
    fn test_escaped_pattern_matches_literally() {
        let pattern = format!("%{}%", escape_like("50%_off"));

        assert!(ilike_match("Now 50%_OFF everything", &pattern));
        assert!(!ilike_match("Now 50 percent off", &pattern));
        assert!(!ilike_match("50x-off", &pattern));
    }

    #[test]
    fn test_star_matches_any_one_character() {
        let pattern = contains_pattern("5*3");
        assert_eq!(pattern, "%5_3%");

        assert!(ilike_match("rated 5*3", &pattern));
        assert!(ilike_match("rated 5x3", &pattern));
        assert!(!ilike_match("rated 53", &pattern));
        assert!(!pattern.contains('*'));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_row_window_bounds() {
        let window = RowWindow::new(10, 10);
        assert_eq!(window.start(), 10);
        assert_eq!(window.end(), 19);

        let single = RowWindow::new(0, 1);
        assert_eq!(single.end(), 0);
    }
}
