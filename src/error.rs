//! Error types for the normalizer and the provider client.

use thiserror::Error;

/// Failures produced while normalizing a chat completion response.
///
/// `MissingChoices` and `NoChoicesAvailable` are deliberately distinct so
/// callers can tell "malformed" apart from "well-formed but empty".
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The response body could not be decoded into any structured form.
    /// The original decode error is surfaced unwrapped.
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// The completion carries no `choices` field at all.
    #[error("LLM response missing 'choices' field")]
    MissingChoices,

    /// The completion is structurally valid but contains zero choices.
    #[error("LLM response contained no choices")]
    NoChoicesAvailable,
}

/// Failures produced by the provider client around a single call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key in the environment or the auth store.
    #[error("API key not found: set {env} or add '{provider}' to auth.json")]
    MissingApiKey { env: String, provider: String },

    /// The HTTP request itself failed.
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response arrived but could not be normalized.
    #[error(transparent)]
    Response(#[from] ResponseError),
}
