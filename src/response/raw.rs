//! Captured transport responses.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;

/// A chat completion response as it came off the wire.
///
/// Everything needed for diagnostics is captured up front: status code,
/// request URL, headers and the raw body text. Status and URL are optional
/// so a response can be constructed without transport metadata (e.g. when
/// feeding the normalizer from a recorded body).
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: Option<u16>,
    url: Option<String>,
    headers: HeaderMap,
    body: String,
}

impl RawResponse {
    pub fn new(
        status: Option<u16>,
        url: Option<String>,
        headers: HeaderMap,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status,
            url,
            headers,
            body: body.into(),
        }
    }

    /// Capture a reqwest response in full, consuming it.
    ///
    /// A body that cannot be read is replaced with a placeholder naming the
    /// read failure, so the primary error being diagnosed is never masked
    /// by a secondary one.
    pub async fn capture(response: reqwest::Response) -> Self {
        let status = Some(response.status().as_u16());
        let url = Some(response.url().to_string());
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(text) => text,
            Err(err) => format!("<failed to read response body: {err}>"),
        };
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body into a JSON value.
    ///
    /// A body served under a non-JSON content type is yielded as a JSON
    /// string so the caller can decide what to make of it (misbehaving
    /// servers answer non-streaming requests with `text/event-stream`
    /// bodies). Everything else must decode as JSON, and the decode error
    /// is returned as-is.
    pub fn parse(&self) -> Result<Value, serde_json::Error> {
        if self.declares_non_json_content() {
            return Ok(Value::String(self.body.clone()));
        }
        serde_json::from_str(&self.body)
    }

    fn declares_non_json_content(&self) -> bool {
        let Some(content_type) = self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
        else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        !mime.is_empty() && !mime.contains("json")
    }
}
