//! AI adapter: LLM backend abstraction + OpenAI chat completions + mock.
//!
//! Backends return `Err` on any transport, status or decoding problem; callers
//! decide how to degrade. Absence of a backend (no key, disabled, unknown
//! provider) is a normal configuration and is reported by `probe_backend`
//! returning `None`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::LlmConfig;

pub const ENV_TEST_MODE: &str = "AI_TEST_MODE";

/// Text generation backend. Both call shapes take a system + user prompt.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Free-text completion.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
    /// JSON-object completion.
    async fn complete_json(&self, system: &str, user: &str) -> Result<serde_json::Value>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynLlm = Arc<dyn LlmBackend>;

/// Capability probe: returns a backend only when one is configured and
/// can be initialized.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock backend.
/// * Else if `enabled == false`, unsupported provider or no API key, `None`.
/// * Else builds the OpenAI backend.
pub fn probe_backend(cfg: &LlmConfig) -> Option<DynLlm> {
    if std::env::var(ENV_TEST_MODE)
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        info!("{ENV_TEST_MODE}=mock; using mock LLM backend");
        return Some(Arc::new(MockBackend::default()));
    }
    if !cfg.enabled {
        info!("LLM disabled in config; using heuristic summaries");
        return None;
    }
    if cfg.provider != "openai" {
        info!(provider = %cfg.provider, "unsupported LLM provider; using heuristic summaries");
        return None;
    }
    let Some(api_key) = cfg.resolve_api_key() else {
        info!("OPENAI_API_KEY not set; using heuristic summaries");
        return None;
    };
    match OpenAiBackend::new(cfg, api_key) {
        Ok(b) => Some(Arc::new(b)),
        Err(e) => {
            warn!(error = ?e, "failed to initialize OpenAI client; using heuristic summaries");
            None
        }
    }
}

// ------------------------------------------------------------
// OpenAI
// ------------------------------------------------------------

/// OpenAI provider (Chat Completions API).
pub struct OpenAiBackend {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
}

impl OpenAiBackend {
    pub fn new(cfg: &LlmConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("faab-blogger/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("reqwest client")?;
        Ok(Self {
            http,
            api_key,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
        })
    }

    async fn chat(&self, system: &str, user: &str, json_mode: bool) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: &'static str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            #[serde(skip_serializing_if = "Option::is_none")]
            response_format: Option<ResponseFormat>,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: Option<String>,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let body: Resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai request")?
            .error_for_status()
            .context("openai status")?
            .json()
            .await
            .context("openai response body")?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        let cleaned = sanitize_completion(&content);
        if cleaned.is_empty() {
            return Err(anyhow!("openai returned empty content"));
        }
        Ok(cleaned)
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat(system, user, false).await
    }

    async fn complete_json(&self, system: &str, user: &str) -> Result<serde_json::Value> {
        let raw = self.chat(system, user, true).await?;
        parse_json_payload(&raw)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Mock
// ------------------------------------------------------------

/// Deterministic backend for tests/local runs.
#[derive(Clone)]
pub struct MockBackend {
    pub text: String,
    pub json: serde_json::Value,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            text: "Mock analyst note.".to_string(),
            json: serde_json::json!({
                "recommendation": "pass",
                "confidence": 0.5,
                "rationale": "Mock rationale."
            }),
        }
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn complete_json(&self, _system: &str, _user: &str) -> Result<serde_json::Value> {
        Ok(self.json.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Sanitization
// ------------------------------------------------------------

/// Normalize line endings, drop trailing spaces per line, trim.
pub fn sanitize_completion(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a JSON object, tolerating a surrounding ``` / ```json fence.
pub fn parse_json_payload(raw: &str) -> Result<serde_json::Value> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    let v: serde_json::Value =
        serde_json::from_str(unfenced).context("LLM payload is not valid JSON")?;
    if !v.is_object() {
        return Err(anyhow!("LLM payload is not a JSON object"));
    }
    Ok(v)
}
