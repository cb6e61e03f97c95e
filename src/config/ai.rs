// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const ENV_PROVIDER: &str = "FAAB_BLOGGER_LLM";
pub const ENV_MODEL: &str = "FAAB_BLOGGER_MODEL";
pub const ENV_TEMPERATURE: &str = "FAAB_BLOGGER_TEMPERATURE";

fn default_enabled() -> bool {
    true
}
fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.4
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// "openai" (case-insensitive). Anything else disables the LLM path.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// "ENV" means: read from OPENAI_API_KEY at probe time.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Apply `FAAB_BLOGGER_*` overrides on top of file/default values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(p) = env::var(ENV_PROVIDER) {
            if !p.trim().is_empty() {
                self.provider = p;
            }
        }
        if let Ok(m) = env::var(ENV_MODEL) {
            if !m.trim().is_empty() {
                self.model = m;
            }
        }
        if let Ok(raw) = env::var(ENV_TEMPERATURE) {
            match raw.trim().parse::<f32>() {
                Ok(t) => self.temperature = t,
                Err(_) => warn!(value = %raw, "ignoring unparseable {ENV_TEMPERATURE}"),
            }
        }
        self.normalize();
    }

    pub fn normalize(&mut self) {
        self.provider = self.provider.trim().to_lowercase();
        if !(0.0..=2.0).contains(&self.temperature) {
            self.temperature = default_temperature();
        }
    }

    /// Resolve the API key; "ENV" reads the provider's key variable.
    /// Returns `None` when no usable key is available.
    pub fn resolve_api_key(&self) -> Option<String> {
        let raw = if self.api_key.trim().eq_ignore_ascii_case("env") {
            match self.provider.as_str() {
                "openai" => env::var("OPENAI_API_KEY").ok()?,
                _ => return None,
            }
        } else {
            self.api_key.clone()
        };
        let key = raw.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}
