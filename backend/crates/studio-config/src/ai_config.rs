use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL, DEFAULT_AI_PROVIDER,
};

use serde::{Deserialize, Serialize};

const KNOWN_PROVIDERS: [&str; 3] = ["openai", "deepseek", "ollama"];

/// Chat provider settings used by the assistant panel.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: String::from(DEFAULT_AI_PROVIDER),
            api_key: String::new(),
            base_url: String::from(DEFAULT_AI_BASE_URL),
            model: String::from(DEFAULT_AI_MODEL),
        }
    }
}

// Keeps the key out of debug output and logs.
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AiConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(ConfigError::ai(format!(
                "ai.provider must be one of {}, got '{}'",
                KNOWN_PROVIDERS.join(", "),
                self.provider
            )));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ai(format!(
                "ai.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ai("ai.model cannot be empty"));
        }

        Ok(())
    }
}
