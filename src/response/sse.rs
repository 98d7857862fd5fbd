//! Reassembly of SSE payloads served as plain response bodies.
//!
//! Some OpenAI-compatible servers answer a non-streaming request with a
//! serialized `text/event-stream` body. Rather than failing the call, the
//! `data:` lines are collapsed back into a single chat-completion-shaped
//! value.

use serde_json::{json, Value};

/// Whether a body looks like a serialized SSE stream rather than a
/// structured completion.
///
/// This is a content-sniffing heuristic by necessity; it is kept behind a
/// named predicate so it can be tightened without touching the reassembly.
pub fn looks_like_sse_stream(text: &str) -> bool {
    text.trim_start().starts_with("data:")
}

/// Collapse the `data:` lines of a serialized SSE stream into a single
/// completion-shaped value.
///
/// Non-`data:` lines, empty payloads, the `[DONE]` terminator and payloads
/// that fail to decode are all skipped. Delta content is concatenated in
/// stream order with no separator. Top-level metadata comes from the last
/// payload that decoded. Returns `None` when no payload decoded at all.
pub fn coalesce_stream_chunks(text: &str) -> Option<Value> {
    let mut content = String::new();
    let mut last_payload: Option<Value> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }
        let Ok(parsed) = serde_json::from_str::<Value>(payload) else {
            continue;
        };
        if let Some(choices) = parsed.get("choices").and_then(Value::as_array) {
            for choice in choices {
                if let Some(delta) = choice.pointer("/delta/content").and_then(Value::as_str) {
                    if !delta.is_empty() {
                        content.push_str(delta);
                    }
                }
            }
        }
        last_payload = Some(parsed);
    }

    let last = last_payload?;

    let mut completion = json!({
        "id": last.get("id").and_then(Value::as_str).unwrap_or("streamed-response"),
        "object": "chat.completion",
        "model": last.get("model").and_then(Value::as_str).unwrap_or("unknown-model"),
        "created": last.get("created").and_then(Value::as_i64).unwrap_or(0),
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content,
            },
            "finish_reason": "stop",
            "logprobs": null,
        }],
        "system_fingerprint": last.get("system_fingerprint").cloned().unwrap_or(Value::Null),
    });

    // Usage is carried over verbatim, but only when it is actually a map.
    if let Some(usage) = last.get("usage").filter(|u| u.is_object()) {
        completion["usage"] = usage.clone();
    }

    Some(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD: &str = concat!(
        "data: {\"id\":\"chunk-1\",\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n",
        "data: {\"id\":\"chunk-2\",\"choices\":[{\"delta\":{\"content\":\" World\"}}]}\n",
        "data: [DONE]\n",
    );

    #[test]
    fn test_detects_sse_stream() {
        assert!(looks_like_sse_stream("data: {}"));
        assert!(looks_like_sse_stream("  \ndata: [DONE]"));
        assert!(!looks_like_sse_stream("{\"choices\":[]}"));
        assert!(!looks_like_sse_stream(""));
    }

    #[test]
    fn test_concatenates_deltas_in_order_without_separator() {
        let completion = coalesce_stream_chunks(HELLO_WORLD).unwrap();
        assert_eq!(
            completion["choices"][0]["message"]["content"],
            "Hello World"
        );
        assert_eq!(completion["choices"][0]["message"]["role"], "assistant");
        assert_eq!(completion["choices"][0]["finish_reason"], "stop");
        assert_eq!(completion["choices"][0]["index"], 0);
        assert_eq!(completion["object"], "chat.completion");
    }

    #[test]
    fn test_is_idempotent() {
        let first = coalesce_stream_chunks(HELLO_WORLD);
        let second = coalesce_stream_chunks(HELLO_WORLD);
        assert_eq!(first, second);
    }

    #[test]
    fn test_done_only_stream_yields_none() {
        assert!(coalesce_stream_chunks("data: [DONE]\n").is_none());
        assert!(coalesce_stream_chunks("data:\n\ndata: [DONE]\n").is_none());
    }

    #[test]
    fn test_malformed_lines_are_skipped_not_fatal() {
        let text = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
            "data: {broken json\n",
            "event: ping\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n",
            "data: [DONE]\n",
        );
        let completion = coalesce_stream_chunks(text).unwrap();
        assert_eq!(completion["choices"][0]["message"]["content"], "ok!");
    }

    #[test]
    fn test_metadata_comes_from_last_payload() {
        let text = concat!(
            "data: {\"id\":\"a\",\"model\":\"m-old\",\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n",
            "data: {\"id\":\"b\",\"model\":\"m-new\",\"created\":1717171717,",
            "\"system_fingerprint\":\"fp_42\",\"choices\":[{\"delta\":{}}]}\n",
            "data: [DONE]\n",
        );
        let completion = coalesce_stream_chunks(text).unwrap();
        assert_eq!(completion["id"], "b");
        assert_eq!(completion["model"], "m-new");
        assert_eq!(completion["created"], 1717171717);
        assert_eq!(completion["system_fingerprint"], "fp_42");
    }

    #[test]
    fn test_fallback_metadata_when_payloads_are_bare() {
        let completion =
            coalesce_stream_chunks("data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n")
                .unwrap();
        assert_eq!(completion["id"], "streamed-response");
        assert_eq!(completion["model"], "unknown-model");
        assert_eq!(completion["created"], 0);
        assert!(completion["system_fingerprint"].is_null());
        assert!(completion.get("usage").is_none());
    }

    #[test]
    fn test_usage_copied_verbatim_only_when_mapping() {
        let with_usage = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}],",
            "\"usage\":{\"prompt_tokens\":3,\"completion_tokens\":7,\"extra\":true}}\n",
        );
        let completion = coalesce_stream_chunks(with_usage).unwrap();
        assert_eq!(completion["usage"]["prompt_tokens"], 3);
        assert_eq!(completion["usage"]["extra"], true);

        let bad_usage = "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}],\"usage\":5}\n";
        let completion = coalesce_stream_chunks(bad_usage).unwrap();
        assert!(completion.get("usage").is_none());
    }

    #[test]
    fn test_empty_delta_content_is_ignored() {
        let text = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"end\"}}]}\n",
        );
        let completion = coalesce_stream_chunks(text).unwrap();
        assert_eq!(completion["choices"][0]["message"]["content"], "end");
    }
}
