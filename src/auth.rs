//! Authentication configuration loading
//!
//! Loads API keys and provider settings from:
//! - $XDG_DATA_HOME/magpie/auth.json (preferred)
//! - ~/.local/share/magpie/auth.json (fallback)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Authentication entry for a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthEntry {
    /// Simple API key authentication
    #[serde(rename = "api")]
    Api {
        key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl AuthEntry {
    /// Get the API key
    pub fn api_key(&self) -> &str {
        match self {
            AuthEntry::Api { key, .. } => key,
        }
    }

    /// Get the base URL if configured
    pub fn base_url(&self) -> Option<&str> {
        match self {
            AuthEntry::Api { base_url, .. } => base_url.as_deref(),
        }
    }
}

/// Authentication configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthConfig {
    pub providers: HashMap<String, AuthEntry>,
}

impl AuthConfig {
    /// Load auth config from the default location
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load auth config from a specific path
    pub fn load_from(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AuthConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        // dirs honors $XDG_DATA_HOME and falls back to ~/.local/share
        if let Some(data_dir) = dirs::data_dir() {
            return Ok(data_dir.join("magpie").join("auth.json"));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Ok(PathBuf::from(home).join(".local/share/magpie/auth.json"));
        }

        Ok(PathBuf::from("magpie/auth.json"))
    }

    /// Get auth entry for a provider
    pub fn get(&self, provider: &str) -> Option<&AuthEntry> {
        self.providers.get(provider)
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.providers.get(provider).map(|e| e.api_key())
    }

    /// Get base URL for a provider
    pub fn base_url(&self, provider: &str) -> Option<&str> {
        self.providers.get(provider).and_then(|e| e.base_url())
    }

    /// List all configured providers
    pub fn providers(&self) -> impl Iterator<Item = &String> {
        self.providers.keys()
    }
}
