//! Diagnostic detail collection for response failures.
//!
//! Every log record emitted by the normalizer carries the same detail
//! payload: transport metadata plus the raw body, so a failure can be
//! diagnosed from the log stream alone without re-running the request.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawResponse;

/// Transport-level context for one response, in loggable form.
///
/// Headers are flattened to a sorted string map so the serialized record is
/// stable across runs. `parsed_type` names the JSON type the body decoded
/// to, when it decoded at all.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseDetails {
    pub status_code: Option<u16>,
    pub url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub response_body: String,
    pub parsed_type: Option<&'static str>,
}

impl ResponseDetails {
    /// Collect details from a captured response and, when available, the
    /// value its body parsed into.
    pub fn collect(raw: &RawResponse, parsed: Option<&Value>) -> Self {
        Self {
            status_code: raw.status(),
            url: raw.url().map(str::to_owned),
            headers: flatten_headers(raw.headers()),
            response_body: raw.body().to_owned(),
            parsed_type: parsed.map(value_type_name),
        }
    }
}

impl fmt::Display for ResponseDetails {
    /// One-line summary: `status=<S> url=<U> parsed=<P> body=<B>`, with
    /// `none` standing in for absent fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "status={status}")?,
            None => write!(f, "status=none")?,
        }
        write!(f, " url={}", self.url.as_deref().unwrap_or("none"))?;
        write!(f, " parsed={}", self.parsed_type.unwrap_or("none"))?;
        write!(f, " body={}", self.response_body)
    }
}

/// Name of a JSON value's type, for log records.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use serde_json::json;

    #[test]
    fn test_summary_line_with_full_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let raw = RawResponse::new(
            Some(200),
            Some("https://api.example.com/v1/chat/completions".into()),
            headers,
            r#"{"id":"cmpl-1"}"#,
        );
        let parsed = json!({"id": "cmpl-1"});
        let details = ResponseDetails::collect(&raw, Some(&parsed));
        assert_eq!(
            details.to_string(),
            "status=200 url=https://api.example.com/v1/chat/completions \
             parsed=object body={\"id\":\"cmpl-1\"}"
        );
    }

    #[test]
    fn test_summary_line_with_missing_metadata() {
        let raw = RawResponse::new(None, None, HeaderMap::new(), "oops");
        let details = ResponseDetails::collect(&raw, None);
        assert_eq!(details.to_string(), "status=none url=none parsed=none body=oops");
    }

    #[test]
    fn test_headers_flattened_into_sorted_map() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req-9"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
        let raw = RawResponse::new(Some(200), None, headers, "");
        let details = ResponseDetails::collect(&raw, None);
        assert_eq!(details.headers["content-type"], "text/event-stream");
        assert_eq!(details.headers["x-request-id"], "req-9");
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&Value::Null), "null");
        assert_eq!(value_type_name(&json!(true)), "bool");
        assert_eq!(value_type_name(&json!(3)), "number");
        assert_eq!(value_type_name(&json!("s")), "string");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }

    #[test]
    fn test_details_serialize_for_structured_logging() {
        let raw = RawResponse::new(Some(500), None, HeaderMap::new(), "body");
        let details = ResponseDetails::collect(&raw, None);
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["status_code"], 500);
        assert_eq!(value["response_body"], "body");
        assert!(value["url"].is_null());
    }
}
