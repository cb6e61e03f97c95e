// tests/analyst_fallback.rs
// Env-mutating tests are serialized with serial_test.

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use faab_blogger::ai_adapter::{LlmBackend, MockBackend, ENV_TEST_MODE};
use faab_blogger::analyze::{
    build_analyst, Analyst, DecisionMaker, HeuristicAnalyst, LlmAnalyst, TextGenerator,
};
use faab_blogger::config::LlmConfig;
use faab_blogger::engine::{heuristic_decision, heuristic_summary};
use faab_blogger::models::Profile;
use faab_blogger::Recommendation;

/// Backend that always fails, like an outage or a revoked key.
struct DownBackend;

#[async_trait]
impl LlmBackend for DownBackend {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(anyhow!("connect timeout"))
    }
    async fn complete_json(&self, _system: &str, _user: &str) -> Result<serde_json::Value> {
        Err(anyhow!("connect timeout"))
    }
    fn name(&self) -> &'static str {
        "down"
    }
}

fn injured_backup() -> Profile {
    let mut p = Profile::new("9997", "Backup Receiver", 100_000);
    p.team = Some("NYJ".into());
    p.position = Some("WR".into());
    p.injury_status = Some("Out".into());
    p.depth_chart_order = Some(3);
    p
}

/// Small RAII helper to snapshot & restore env vars in each test.
struct EnvSnapshot {
    saved: Vec<(String, Option<String>)>,
}
impl EnvSnapshot {
    fn set(pairs: &[(&str, Option<&str>)]) -> Self {
        let mut saved = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            saved.push((k.to_string(), env::var(k).ok()));
            match v {
                Some(val) => env::set_var(k, val),
                None => env::remove_var(k),
            }
        }
        Self { saved }
    }
}
impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (k, maybe_v) in self.saved.drain(..) {
            match maybe_v {
                Some(v) => env::set_var(&k, v),
                None => env::remove_var(&k),
            }
        }
    }
}

#[tokio::test]
async fn outage_degrades_every_call_to_heuristic() {
    let analyst = LlmAnalyst::new(Arc::new(DownBackend));
    let p = injured_backup();

    let summary = analyst.summarize(&p, &[]).await;
    assert_eq!(summary, heuristic_summary(&p, &[]));

    let d = analyst.decide(&p, &summary).await;
    assert_eq!(d, heuristic_decision(&p, &summary));
    assert_eq!(d.recommendation, Recommendation::Pass);

    let section = analyst.draft_section("sys", "user", "fixed fallback").await;
    assert_eq!(section, "fixed fallback");
}

#[tokio::test]
async fn malformed_structured_payload_falls_back_per_call() {
    let backend = MockBackend {
        text: "LLM summary.".into(),
        json: serde_json::json!({"recommendation": "strong buy", "confidence": 2}),
    };
    let analyst = LlmAnalyst::new(Arc::new(backend));
    let p = injured_backup();

    // Free-text path still uses the LLM.
    assert_eq!(analyst.summarize(&p, &[]).await, "LLM summary.");
    // Structured path degrades to the heuristic for this call only.
    let d = analyst.decide(&p, "LLM summary.").await;
    assert_eq!(d, heuristic_decision(&p, "LLM summary."));
}

#[tokio::test]
async fn valid_structured_payload_is_used() {
    let backend = MockBackend {
        text: "x".into(),
        json: serde_json::json!({"recommendation": "buy", "confidence": 0.66, "rationale": "Volume role."}),
    };
    let analyst = LlmAnalyst::new(Arc::new(backend));
    let d = analyst.decide(&injured_backup(), "s").await;
    assert_eq!(d.recommendation, Recommendation::Buy);
    assert!((d.confidence - 0.66).abs() < 1e-9);
    assert_eq!(d.rationale, "Volume role.");
}

#[tokio::test]
async fn heuristic_output_is_bounded_and_reproducible() {
    let analyst = HeuristicAnalyst;
    let statuses = [None, Some("Out"), Some("Questionable"), Some("IR"), Some("Healthy")];
    let depths = [None, Some(1), Some(2), Some(3), Some(7)];
    for count in [0u64, 1, 45_000, 74_999, 75_000, 90_001, 149_999, 150_000, 10_000_000] {
        for status in statuses {
            for depth in depths {
                let mut p = Profile::new("1", "Grid Player", count);
                p.injury_status = status.map(str::to_string);
                p.depth_chart_order = depth;

                let a = analyst.decide(&p, "same summary").await;
                let b = analyst.decide(&p, "same summary").await;
                assert_eq!(a, b);
                assert!((0.0..=1.0).contains(&a.confidence), "{a:?}");
                assert!(matches!(
                    a.recommendation,
                    Recommendation::Buy | Recommendation::Pass
                ));
            }
        }
    }
}

#[serial_test::serial]
#[tokio::test]
async fn missing_credentials_select_heuristic_mode() {
    let _env = EnvSnapshot::set(&[(ENV_TEST_MODE, None), ("OPENAI_API_KEY", None)]);
    let analyst = build_analyst(&LlmConfig::default());
    assert_eq!(analyst.mode(), "heuristic");

    let p = injured_backup();
    let d = analyst.decide(&p, "s").await;
    assert_eq!(d, heuristic_decision(&p, "s"));
}

#[serial_test::serial]
#[tokio::test]
async fn unsupported_provider_selects_heuristic_mode() {
    let _env = EnvSnapshot::set(&[(ENV_TEST_MODE, None), ("OPENAI_API_KEY", Some("sk-test"))]);
    let cfg = LlmConfig {
        provider: "claude".into(),
        ..Default::default()
    };
    assert_eq!(build_analyst(&cfg).mode(), "heuristic");
}

#[serial_test::serial]
#[tokio::test]
async fn mock_mode_selects_llm_analyst() {
    let _env = EnvSnapshot::set(&[(ENV_TEST_MODE, Some("mock"))]);
    let analyst = build_analyst(&LlmConfig::default());
    assert_eq!(analyst.mode(), "llm");
    assert_eq!(
        analyst.summarize(&injured_backup(), &[]).await,
        "Mock analyst note."
    );
}
