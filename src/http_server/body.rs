//! Request body decoding shared by the login and list routes.
//!
//! Bodies arrive either as JSON or as `application/x-www-form-urlencoded`.
//! Both decode into the same field map; form values are always strings.

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Whether the request declares a urlencoded form body
pub fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decode a body into a field map.
///
/// Empty bodies and JSON `null` give an empty map. Anything other than a form
/// or a JSON object is an invalid body.
pub fn parse_fields(headers: &HeaderMap, body: &[u8]) -> ApiResult<Map<String, Value>> {
    if is_form_encoded(headers) {
        return Ok(parse_form(body));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

/// Later duplicates of a key replace earlier ones
fn parse_form(body: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(body)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}
