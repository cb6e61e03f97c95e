// src/analyze/mod.rs
//! Analysis entry: summaries, section drafts and buy/pass decisions.
//!
//! Two interchangeable implementations sit behind `TextGenerator` +
//! `DecisionMaker`: `HeuristicAnalyst` (deterministic, always available) and
//! `LlmAnalyst`, which degrades to the heuristic on every failed call.
//! Which one runs is decided once, at construction, by `build_analyst`.

pub mod ai_adapter;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};

use crate::analyze::ai_adapter::{probe_backend, DynLlm};
use crate::config::LlmConfig;
use crate::decision::{Decision, Recommendation};
use crate::engine::{heuristic_decision, heuristic_summary, render_headline_bullets};
use crate::models::{NewsItem, Profile};

const SUMMARY_SYSTEM: &str =
    "You are a fantasy football analyst. Summarize why a player is trending on the waiver wire.";
const DECISION_SYSTEM: &str = "You are an expert on fantasy football transactions. Evaluate waiver wire adds, output 'buy' to recommend spending FAAB or 'pass' otherwise.";

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short context summary for a player and their headlines.
    async fn summarize(&self, profile: &Profile, headlines: &[NewsItem]) -> String;
    /// Free-form blog section; `fallback` is returned when no text can be generated.
    async fn draft_section(&self, system: &str, user: &str, fallback: &str) -> String;
}

#[async_trait]
pub trait DecisionMaker: Send + Sync {
    async fn decide(&self, profile: &Profile, summary: &str) -> Decision;
}

/// Both capabilities behind one handle.
pub trait Analyst: TextGenerator + DecisionMaker {
    fn mode(&self) -> &'static str;
}

pub type SharedAnalyst = Arc<dyn Analyst>;

/// Probe the LLM configuration once and pick the implementation.
pub fn build_analyst(cfg: &LlmConfig) -> SharedAnalyst {
    match probe_backend(cfg) {
        Some(backend) => {
            info!(provider = backend.name(), model = %cfg.model, "LLM analyst enabled");
            Arc::new(LlmAnalyst::new(backend))
        }
        None => Arc::new(HeuristicAnalyst),
    }
}

// ------------------------------------------------------------
// Heuristic
// ------------------------------------------------------------

pub struct HeuristicAnalyst;

#[async_trait]
impl TextGenerator for HeuristicAnalyst {
    async fn summarize(&self, profile: &Profile, headlines: &[NewsItem]) -> String {
        heuristic_summary(profile, headlines)
    }

    async fn draft_section(&self, _system: &str, _user: &str, fallback: &str) -> String {
        fallback.to_string()
    }
}

#[async_trait]
impl DecisionMaker for HeuristicAnalyst {
    async fn decide(&self, profile: &Profile, summary: &str) -> Decision {
        heuristic_decision(profile, summary)
    }
}

impl Analyst for HeuristicAnalyst {
    fn mode(&self) -> &'static str {
        "heuristic"
    }
}

// ------------------------------------------------------------
// LLM with per-call fallback
// ------------------------------------------------------------

pub struct LlmAnalyst {
    backend: DynLlm,
}

impl LlmAnalyst {
    pub fn new(backend: DynLlm) -> Self {
        Self { backend }
    }
}

pub fn summary_prompt(profile: &Profile, headlines: &[NewsItem]) -> String {
    format!(
        "Player: {} ({} - {})\nTrending adds: {}\nInjury status: {}\nHeadlines:\n{}\nProvide a concise summary (2 sentences).",
        profile.name,
        profile.position.as_deref().unwrap_or("N/A"),
        profile.team.as_deref().unwrap_or("FA"),
        profile.trending_count,
        profile.injury().unwrap_or("None"),
        render_headline_bullets(headlines),
    )
}

pub fn decision_prompt(profile: &Profile, summary: &str) -> String {
    format!(
        "Player: {}\nPosition: {}\nTeam: {}\nTrending adds: {}\nInjury status: {}\nSummary: {}\nRespond with JSON containing recommendation ('buy' or 'pass'), confidence (0-1), and rationale (<=70 words).",
        profile.name,
        profile.position.as_deref().unwrap_or("N/A"),
        profile.team.as_deref().unwrap_or("FA"),
        profile.trending_count,
        profile.injury().unwrap_or("None"),
        summary,
    )
}

/// Validate a structured decision payload.
///
/// `recommendation` defaults to pass, `confidence` to 0.5 and `rationale` to
/// the summary when absent; present-but-invalid values are errors.
pub fn parse_structured_decision(
    profile: &Profile,
    summary: &str,
    payload: &serde_json::Value,
) -> Result<Decision> {
    let obj = payload
        .as_object()
        .ok_or_else(|| anyhow!("decision payload is not an object"))?;

    let recommendation = match obj.get("recommendation") {
        None | Some(serde_json::Value::Null) => Recommendation::Pass,
        Some(serde_json::Value::String(s)) => s.parse()?,
        Some(other) => return Err(anyhow!("recommendation has wrong type: {other}")),
    };

    let confidence = match obj.get("confidence") {
        None | Some(serde_json::Value::Null) => 0.5,
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| anyhow!("confidence is not a float"))?,
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("confidence is not numeric: {s:?}"))?,
        Some(other) => return Err(anyhow!("confidence has wrong type: {other}")),
    };
    if !(0.0..=1.0).contains(&confidence) {
        return Err(anyhow!("confidence out of range: {confidence}"));
    }

    let rationale = obj
        .get("rationale")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(summary);

    Ok(Decision::new(
        profile.clone(),
        recommendation,
        confidence,
        rationale,
    ))
}

#[async_trait]
impl TextGenerator for LlmAnalyst {
    async fn summarize(&self, profile: &Profile, headlines: &[NewsItem]) -> String {
        let user = summary_prompt(profile, headlines);
        match self.backend.complete(SUMMARY_SYSTEM, &user).await {
            Ok(text) => text,
            Err(e) => {
                warn!(player = %profile.name, error = ?e, "LLM summarization failed; using heuristic fallback");
                counter!("llm_fallback_total").increment(1);
                heuristic_summary(profile, headlines)
            }
        }
    }

    async fn draft_section(&self, system: &str, user: &str, fallback: &str) -> String {
        match self.backend.complete(system, user).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = ?e, "LLM section draft failed; using fallback");
                counter!("llm_fallback_total").increment(1);
                fallback.to_string()
            }
        }
    }
}

#[async_trait]
impl DecisionMaker for LlmAnalyst {
    async fn decide(&self, profile: &Profile, summary: &str) -> Decision {
        let user = decision_prompt(profile, summary);
        let parsed = match self.backend.complete_json(DECISION_SYSTEM, &user).await {
            Ok(payload) => parse_structured_decision(profile, summary, &payload),
            Err(e) => Err(e),
        };
        match parsed {
            Ok(d) => d,
            Err(e) => {
                warn!(player = %profile.name, error = ?e, "LLM decision unusable; using heuristic fallback");
                counter!("llm_fallback_total").increment(1);
                heuristic_decision(profile, summary)
            }
        }
    }
}

impl Analyst for LlmAnalyst {
    fn mode(&self) -> &'static str {
        "llm"
    }
}
