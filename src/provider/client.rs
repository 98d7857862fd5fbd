//! OpenAI-compatible provider client
//!
//! Sends non-streaming chat completion requests over raw HTTP and runs
//! every response through the normalizer, so callers always receive the
//! same shape no matter how the provider misbehaved.

use super::ProviderConfig;
use crate::auth::AuthConfig;
use crate::error::ClientError;
use crate::response::{normalize, NormalizedOutput, RawResponse};
use async_openai::types::ChatCompletionRequestMessage;
use serde_json::Value;

/// Sampling and length options applied to every request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// OpenAI-compatible client wrapper
#[derive(Clone)]
pub struct ChatClient {
    config: ProviderConfig,
    options: RequestOptions,
    api_key_override: Option<String>,
    http_client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client from a provider config
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        // Don't keep connections alive; they are closed properly on drop
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            config,
            options: RequestOptions::default(),
            api_key_override: None,
            http_client,
        })
    }

    /// Set request options
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a fixed API key instead of resolving one from the environment
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key_override = Some(api_key.into());
        self
    }

    /// Get the provider config
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Resolve the API key: explicit override, then environment (with .env
    /// loading), then the XDG auth store.
    fn resolve_api_key(&self) -> Result<String, ClientError> {
        if let Some(key) = &self.api_key_override {
            return Ok(key.clone());
        }

        // Try loading .env file
        let _ = dotenvy::dotenv();

        if let Ok(key) = std::env::var(&self.config.api_key_env) {
            return Ok(key);
        }

        if let Some(key) = Self::key_from_auth_store(&self.config.name) {
            return Ok(key);
        }

        Err(ClientError::MissingApiKey {
            env: self.config.api_key_env.clone(),
            provider: auth_store_key(&self.config.name),
        })
    }

    /// Try to read the API key from the XDG auth store
    fn key_from_auth_store(provider_name: &str) -> Option<String> {
        let auth = AuthConfig::load().ok()?;
        auth.api_key(&auth_store_key(provider_name))
            .map(str::to_owned)
    }

    /// Send a non-streaming chat completion request and normalize the result
    pub async fn chat(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        model: Option<&str>,
    ) -> Result<NormalizedOutput, ClientError> {
        let model = model.unwrap_or(&self.config.default_model);
        let api_key = self.resolve_api_key()?;

        let messages_json: Vec<Value> = messages.iter().map(message_to_json).collect();
        // The prompt being answered is the last message in the request
        let prompt_message = messages_json.last().cloned().unwrap_or(Value::Null);
        let body = build_request_body(model, &messages_json, &self.options);

        let start = std::time::Instant::now();
        tracing::info!(
            target: "llm",
            model = model,
            provider = %self.config.name,
            message_count = messages.len(),
            "Starting chat completion call"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "llm", error = %e, "Chat completion call failed");
                ClientError::Request(e)
            })?;

        let elapsed = start.elapsed();

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                target: "llm",
                status = status,
                error = %message,
                elapsed_ms = elapsed.as_millis() as u64,
                "Chat completion call returned error"
            );
            return Err(ClientError::Api { status, message });
        }

        let raw = RawResponse::capture(response).await;
        let output = normalize(&raw, prompt_message)?;

        tracing::info!(
            target: "llm",
            model = model,
            elapsed_ms = elapsed.as_millis() as u64,
            input_tokens = output.usage.input_tokens,
            output_tokens = output.usage.output_tokens,
            "Chat completion call completed"
        );

        Ok(output)
    }
}

/// Key under which a provider's entry lives in the auth store
fn auth_store_key(provider_name: &str) -> String {
    let lowercase = provider_name.to_lowercase();
    match lowercase.as_str() {
        "lm studio" | "lm-studio" => "lm-studio".to_string(),
        _ => lowercase,
    }
}

fn build_request_body(model: &str, messages_json: &[Value], options: &RequestOptions) -> Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages_json,
    });
    if let Some(max_tokens) = options.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }
    if let Some(temperature) = options.temperature {
        body["temperature"] = serde_json::json!(temperature);
    }
    body
}

/// Convert a ChatCompletionRequestMessage to JSON
fn message_to_json(msg: &ChatCompletionRequestMessage) -> Value {
    use async_openai::types::*;

    match msg {
        ChatCompletionRequestMessage::System(s) => {
            serde_json::json!({
                "role": "system",
                "content": s.content
            })
        }
        ChatCompletionRequestMessage::User(u) => {
            let content = match &u.content {
                ChatCompletionRequestUserMessageContent::Text(t) => t.clone(),
                ChatCompletionRequestUserMessageContent::Array(parts) => parts
                    .iter()
                    .filter_map(|p| {
                        if let ChatCompletionRequestUserMessageContentPart::Text(t) = p {
                            Some(t.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(""),
            };
            serde_json::json!({
                "role": "user",
                "content": content
            })
        }
        ChatCompletionRequestMessage::Assistant(a) => {
            let mut msg = serde_json::json!({ "role": "assistant" });
            if let Some(content) = &a.content {
                msg["content"] = serde_json::json!(content);
            }
            msg
        }
        ChatCompletionRequestMessage::Tool(t) => {
            serde_json::json!({
                "role": "tool",
                "tool_call_id": t.tool_call_id,
                "content": t.content
            })
        }
        _ => serde_json::json!({"role": "unknown"}),
    }
}
