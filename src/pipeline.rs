//! # Pipeline
//! trending adds → profiles → research → decisions → post → published path.
//! Stages run strictly one after another; only the trend fetch, the first
//! directory load and publishing can abort a run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::analyze::{build_analyst, DecisionMaker, SharedAnalyst, TextGenerator};
use crate::config::AppConfig;
use crate::engine::context_points;
use crate::ingest::NewsAggregator;
use crate::metrics::ensure_metrics_described;
use crate::models::{Evaluation, Profile, Research};
use crate::players::{ProfileDirectory, SleeperClient, TrendSource};
use crate::publish::PostStore;
use crate::writer::NarrativeComposer;

/// Trends requested per wanted profile, to absorb unresolvable ids.
pub const TREND_OVERFETCH: usize = 3;

pub struct Pipeline {
    trends: Arc<dyn TrendSource>,
    directory: ProfileDirectory,
    news: NewsAggregator,
    analyst: SharedAnalyst,
    composer: NarrativeComposer,
    store: PostStore,
}

impl Pipeline {
    pub fn new(
        trends: Arc<dyn TrendSource>,
        directory: ProfileDirectory,
        news: NewsAggregator,
        analyst: SharedAnalyst,
        store: PostStore,
    ) -> Self {
        ensure_metrics_described();
        let composer = NarrativeComposer::new(analyst.clone());
        Self {
            trends,
            directory,
            news,
            analyst,
            composer,
            store,
        }
    }

    /// Production wiring: Sleeper, ESPN → Google News, probed LLM, on-disk store.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let sleeper = Arc::new(SleeperClient::new(cfg.sleeper.clone())?);
        let directory = ProfileDirectory::new(sleeper.clone());
        let news = NewsAggregator::from_config(&cfg.news)?;
        let analyst = build_analyst(&cfg.llm);
        let store = PostStore::from_config(&cfg.writer);
        Ok(Self::new(sleeper, directory, news, analyst, store))
    }

    pub fn analyst_mode(&self) -> &'static str {
        self.analyst.mode()
    }

    pub async fn run(&self, top_n: usize) -> Result<PathBuf> {
        if top_n == 0 {
            bail!("top_n must be at least 1");
        }
        info!(top_n, mode = self.analyst_mode(), "starting FAAB blog generation pipeline");

        let profiles = self.top_profiles(top_n).await?;
        info!(players = profiles.len(), "researching context");

        let mut evaluations = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let research = self.research(profile).await;
            evaluations.push(self.evaluate(research).await);
        }

        let post = self.composer.compose(evaluations).await;
        let path = self.store.publish(&post).context("publishing post")?;
        info!(path = %path.display(), "pipeline completed successfully");
        Ok(path)
    }

    /// First `top_n` resolvable profiles in trend rank order.
    pub async fn top_profiles(&self, top_n: usize) -> Result<Vec<Profile>> {
        let trends = self
            .trends
            .trending(top_n.saturating_mul(TREND_OVERFETCH))
            .await
            .context("fetching trending adds")?;
        let profiles = self.directory.profiles_from_trends(&trends, top_n).await?;
        info!(selected = profiles.len(), "selected top players for evaluation");
        Ok(profiles)
    }

    pub async fn research(&self, profile: Profile) -> Research {
        info!(player = %profile.name, "collecting headlines");
        let headlines = self.news.fetch(&profile).await;
        let summary = self.analyst.summarize(&profile, &headlines).await;
        Research {
            context_points: context_points(&profile),
            profile,
            headlines,
            summary,
        }
    }

    pub async fn evaluate(&self, research: Research) -> Evaluation {
        info!(player = %research.profile.name, "evaluating transaction stance");
        let decision = self.analyst.decide(&research.profile, &research.summary).await;
        Evaluation { research, decision }
    }
}
