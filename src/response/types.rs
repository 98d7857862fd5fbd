//! Wire and domain types for chat completion responses.
//!
//! The wire structs are deliberately lenient: providers disagree on which
//! metadata fields they populate, so everything except `choices` defaults
//! when absent. `choices` has no default because its absence is a distinct
//! failure the caller must see.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat completion as OpenAI-compatible providers serialize it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: i64,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
    pub system_fingerprint: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
    pub logprobs: Option<Value>,
}

/// The assistant message inside a choice. Content is optional because tool
/// call responses legitimately omit it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    pub content: Option<String>,
}

/// Provider-reported token usage, in the provider's own vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Token usage in this crate's vocabulary.
///
/// Always present on a normalized output; absent provider usage becomes
/// zero on both sides rather than an optional field callers must unwrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl From<&Usage> for UsageMetrics {
    fn from(usage: &Usage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }
    }
}
