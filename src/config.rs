//! Configuration for the client layer

use crate::auth::AuthConfig;
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Telemetry settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider type (openrouter, openai, anthropic, etc.)
    #[serde(default)]
    pub provider: LlmProvider,

    /// API key (can also be set via environment variable)
    pub api_key: Option<String>,

    /// Base URL for the API (for custom endpoints like LM Studio)
    pub base_url: Option<String>,

    /// Model name/ID
    pub model: String,

    /// Maximum tokens for response
    pub max_tokens: Option<u32>,

    /// Temperature for sampling
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenRouter,
    OpenAI,
    Anthropic,
    /// Custom OpenAI-compatible endpoint (e.g., LM Studio, vLLM)
    Custom,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Directory for log files
    pub log_dir: PathBuf,

    /// Enable verbose logging
    pub verbose: bool,

    /// OTLP endpoint for span export, if any
    pub otel_endpoint: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenRouter,
            api_key: None,
            base_url: None,
            model: "anthropic/claude-sonnet-4".to_string(),
            max_tokens: Some(4096),
            temperature: Some(0.7),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(".magpie_logs"),
            verbose: false,
            otel_endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Create config from a provider name in auth.json
    ///
    /// Looks up the provider in auth.json and uses its API key and base_url.
    /// The model should be specified separately.
    pub fn from_provider(provider: &str, model: &str) -> anyhow::Result<Self> {
        let auth = AuthConfig::load()?;

        let entry = auth
            .get(provider)
            .ok_or_else(|| anyhow::anyhow!("Provider '{}' not found in auth.json", provider))?;

        let llm_provider = if entry.base_url().is_some() {
            LlmProvider::Custom
        } else {
            // Infer provider type from name
            match provider.to_lowercase().as_str() {
                "openrouter" => LlmProvider::OpenRouter,
                "openai" => LlmProvider::OpenAI,
                "anthropic" => LlmProvider::Anthropic,
                _ => LlmProvider::Custom,
            }
        };

        Ok(Self {
            llm: LlmConfig {
                provider: llm_provider,
                api_key: Some(entry.api_key().to_string()),
                base_url: entry.base_url().map(String::from),
                model: model.to_string(),
                max_tokens: Some(4096),
                temperature: Some(0.7),
            },
            telemetry: TelemetryConfig::default(),
        })
    }

    /// List available providers from auth.json
    pub fn list_providers() -> anyhow::Result<Vec<String>> {
        let auth = AuthConfig::load()?;
        Ok(auth.providers().cloned().collect())
    }

    /// Set verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.telemetry.verbose = verbose;
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.llm.api_key = Some(api_key);
        self
    }

    /// Resolve the provider config this LLM configuration describes.
    ///
    /// A configured base_url overrides the provider's default endpoint; the
    /// configured model always overrides the provider default.
    pub fn provider_config(&self) -> ProviderConfig {
        let mut provider = match self.llm.provider {
            LlmProvider::OpenRouter => ProviderConfig::openrouter(),
            LlmProvider::OpenAI => ProviderConfig::openai(),
            LlmProvider::Anthropic => ProviderConfig::anthropic(),
            LlmProvider::Custom => ProviderConfig::custom(
                "custom",
                self.llm
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:1234/v1".to_string()),
                "OPENAI_API_KEY",
                self.llm.model.clone(),
            ),
        };
        if let Some(base_url) = &self.llm.base_url {
            provider.base_url = base_url.clone();
        }
        provider.default_model = self.llm.model.clone();
        provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  provider: openai
  model: gpt-4o
  max_tokens: 2048
telemetry:
  log_dir: /tmp/magpie-logs
  verbose: true
  otel_endpoint: http://localhost:4318
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, Some(2048));
        assert!(config.telemetry.verbose);
        assert_eq!(
            config.telemetry.otel_endpoint.as_deref(),
            Some("http://localhost:4318")
        );
    }

    #[test]
    fn test_provider_config_overrides() {
        let mut config = Config::default();
        config.llm.provider = LlmProvider::OpenAI;
        config.llm.model = "gpt-4o-mini".to_string();
        config.llm.base_url = Some("http://localhost:8000/v1".to_string());

        let provider = config.provider_config();
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
        assert_eq!(provider.default_model, "gpt-4o-mini");
        assert_eq!(provider.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.provider, LlmProvider::OpenRouter);
        assert_eq!(config.telemetry.log_dir, PathBuf::from(".magpie_logs"));
        assert!(config.telemetry.otel_endpoint.is_none());
    }
}
