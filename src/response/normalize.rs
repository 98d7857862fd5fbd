//! Normalization of captured responses into one uniform shape.
//!
//! `normalize` is an ordinary function over a captured response: parse the
//! body, coerce serialized SSE streams back into completion form, validate
//! the choices, and extract the first message together with usage metrics.
//! Every failure is logged with full transport diagnostics before the error
//! is returned.

use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ResponseError;

use super::diagnostics::ResponseDetails;
use super::raw::RawResponse;
use super::sse::{coalesce_stream_chunks, looks_like_sse_stream};
use super::types::{ChatCompletion, ResponseMessage, UsageMetrics};

/// A chat completion reduced to the parts callers consume.
///
/// `usage` is never absent: providers that omit usage yield zero metrics.
/// `raw_model` keeps the full typed completion for callers that need more
/// than the first message.
#[derive(Debug, Clone)]
pub struct NormalizedOutput {
    pub raw_input: Value,
    pub raw_output: ResponseMessage,
    pub content: Option<String>,
    pub raw_model: ChatCompletion,
    pub usage: UsageMetrics,
    pub headers: HeaderMap,
}

/// Normalize a captured response into a [`NormalizedOutput`].
///
/// `prompt_message` is the request message the response answers; it is
/// carried through untouched so callers can pair inputs with outputs.
pub fn normalize(raw: &RawResponse, prompt_message: Value) -> Result<NormalizedOutput, ResponseError> {
    let parsed = match raw.parse() {
        Ok(value) => value,
        Err(err) => {
            let details = ResponseDetails::collect(raw, None);
            tracing::error!(
                target: "llm",
                error = %err,
                details = %details,
                "Failed to parse response from LLM; {details}"
            );
            return Err(ResponseError::Parse(err));
        }
    };

    let completion = normalize_completion(parsed, raw);

    let choices = match completion.get("choices") {
        None => {
            let details = ResponseDetails::collect(raw, Some(&completion));
            tracing::error!(
                target: "llm",
                details = %details,
                "LLM response missing 'choices' field; {details}"
            );
            return Err(ResponseError::MissingChoices);
        }
        Some(choices) => choices,
    };
    if choices.as_array().is_some_and(|c| c.is_empty()) {
        let details = ResponseDetails::collect(raw, Some(&completion));
        tracing::error!(
            target: "llm",
            details = %details,
            "LLM response contained no choices; {details}"
        );
        return Err(ResponseError::NoChoicesAvailable);
    }

    let typed = match ChatCompletion::deserialize(&completion) {
        Ok(typed) => typed,
        Err(err) => {
            let details = ResponseDetails::collect(raw, Some(&completion));
            tracing::error!(
                target: "llm",
                error = %err,
                details = %details,
                "Failed to parse response from LLM; {details}"
            );
            return Err(ResponseError::Parse(err));
        }
    };

    let raw_output = typed.choices[0].message.clone();
    let content = raw_output.content.clone();
    let usage = typed
        .usage
        .as_ref()
        .map(UsageMetrics::from)
        .unwrap_or_default();

    Ok(NormalizedOutput {
        raw_input: prompt_message,
        raw_output,
        content,
        raw_model: typed,
        usage,
        headers: raw.headers().clone(),
    })
}

/// Coerce a parsed body that turned out to be a serialized SSE stream back
/// into completion form. Anything else passes through unchanged.
fn normalize_completion(parsed: Value, raw: &RawResponse) -> Value {
    let Value::String(text) = parsed else {
        return parsed;
    };
    if looks_like_sse_stream(&text) {
        if let Some(completion) = coalesce_stream_chunks(text.trim()) {
            let details = ResponseDetails::collect(raw, Some(&completion));
            tracing::warn!(
                target: "llm",
                details = %details,
                "Coerced streaming response into chat completion; {details}"
            );
            return completion;
        }
    }
    Value::String(text)
}
