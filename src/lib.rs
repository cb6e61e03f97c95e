// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod config;
pub mod decision;
pub mod engine;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod players;
pub mod publish;
pub mod writer;

// ---- Re-exports for stable public API ----
pub use crate::analyze::ai_adapter;
pub use crate::config::AppConfig;
pub use crate::decision::{Decision, Recommendation};
pub use crate::pipeline::Pipeline;

use std::path::PathBuf;

/// Load configuration, wire production clients and run one generation.
pub async fn generate(top_n: usize) -> anyhow::Result<PathBuf> {
    let cfg = AppConfig::load_default()?;
    let pipeline = Pipeline::from_config(&cfg)?;
    pipeline.run(top_n).await
}
